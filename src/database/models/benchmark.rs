use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Allowed values of `benchmarks.category`
pub const BENCHMARK_CATEGORIES: &[&str] = &[
    "performance",
    "financial",
    "operational",
    "satisfaction",
    "other",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Benchmark {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub value: f64,
    pub unit: Option<String>,
    pub target_value: Option<f64>,
    pub percentile: Option<f64>,
    pub period: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBenchmark {
    pub client_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub value: f64,
    pub unit: Option<String>,
    pub target_value: Option<f64>,
    pub percentile: Option<f64>,
    pub period: Option<String>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub value: Option<f64>,
    pub unit: Option<Option<String>>,
    pub target_value: Option<Option<f64>>,
    pub percentile: Option<Option<f64>>,
    pub period: Option<Option<String>>,
}

impl BenchmarkPatch {
    pub fn is_empty(&self) -> bool {
        *self == BenchmarkPatch::default()
    }

    pub fn apply(&self, benchmark: &mut Benchmark) {
        if let Some(name) = &self.name {
            benchmark.name = name.clone();
        }
        if let Some(v) = &self.description {
            benchmark.description = v.clone();
        }
        if let Some(v) = &self.category {
            benchmark.category = v.clone();
        }
        if let Some(v) = self.value {
            benchmark.value = v;
        }
        if let Some(v) = &self.unit {
            benchmark.unit = v.clone();
        }
        if let Some(v) = self.target_value {
            benchmark.target_value = v;
        }
        if let Some(v) = self.percentile {
            benchmark.percentile = v;
        }
        if let Some(v) = &self.period {
            benchmark.period = v.clone();
        }
    }
}
