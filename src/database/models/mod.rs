pub mod benchmark;
pub mod client;
pub mod invite;
pub mod profile;

pub use benchmark::{Benchmark, BenchmarkPatch, NewBenchmark, BENCHMARK_CATEGORIES};
pub use client::{Client, ClientPatch, NewClient};
pub use invite::{InviteStatus, NewInvite, UserInvite};
pub use profile::{NewProfile, Profile, ProfilePatch};
