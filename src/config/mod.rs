use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub platform: PlatformConfig,
    pub email: EmailConfig,
    pub limits: LimitsConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

/// Hosted auth/storage endpoints and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub url: String,
    pub service_role_key: String,
    pub jwt_secret: String,
    pub storage_bucket: String,
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProviderKind {
    Resend,
    Sendgrid,
    Log,
}

impl EmailProviderKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resend" => Some(EmailProviderKind::Resend),
            "sendgrid" => Some(EmailProviderKind::Sendgrid),
            "log" => Some(EmailProviderKind::Log),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub from_address: String,
    pub providers: Vec<EmailProviderKind>,
    pub resend_api_key: Option<String>,
    pub sendgrid_api_key: Option<String>,
    pub app_url: String,
    pub invite_expiry_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_list_limit: i64,
    pub default_list_limit: i64,
    pub bulk_users_max: usize,
    pub bulk_benchmarks_max: usize,
    pub logo_max_bytes: usize,
    pub background_max_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

const REDACTED: &str = "<redacted>";

/// One year
pub const MAX_INVITE_EXPIRY_HOURS: i64 = 24 * 365;

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Platform overrides
        if let Ok(v) = env::var("SUPABASE_URL") {
            self.platform.url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("SUPABASE_SERVICE_ROLE_KEY") {
            self.platform.service_role_key = v;
        }
        if let Ok(v) = env::var("SUPABASE_JWT_SECRET") {
            self.platform.jwt_secret = v;
        }
        if let Ok(v) = env::var("STORAGE_BUCKET") {
            self.platform.storage_bucket = v;
        }
        if let Ok(v) = env::var("HTTP_TIMEOUT_SECS") {
            self.platform.http_timeout_secs = v.parse().unwrap_or(self.platform.http_timeout_secs);
        }

        // Email overrides
        if let Ok(v) = env::var("EMAIL_FROM") {
            self.email.from_address = v;
        }
        if let Ok(v) = env::var("EMAIL_PROVIDERS") {
            let providers: Vec<EmailProviderKind> =
                v.split(',').filter_map(EmailProviderKind::parse).collect();
            if !providers.is_empty() {
                self.email.providers = providers;
            }
        }
        if let Ok(v) = env::var("RESEND_API_KEY") {
            self.email.resend_api_key = Some(v);
        }
        if let Ok(v) = env::var("SENDGRID_API_KEY") {
            self.email.sendgrid_api_key = Some(v);
        }
        if let Ok(v) = env::var("APP_URL") {
            self.email.app_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("INVITE_EXPIRY_HOURS") {
            self.email.invite_expiry_hours = v.parse().unwrap_or(self.email.invite_expiry_hours);
        }

        // Limits overrides
        if let Ok(v) = env::var("LIST_MAX_LIMIT") {
            self.limits.max_list_limit = v.parse().unwrap_or(self.limits.max_list_limit);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self.normalized()
    }

    /// Pull out-of-range overrides back into values the handlers can use
    fn normalized(mut self) -> Self {
        if self.limits.max_list_limit < 1 {
            tracing::warn!("LIST_MAX_LIMIT must be at least 1, using 1");
            self.limits.max_list_limit = 1;
        }
        self.limits.default_list_limit = self.limits.default_list_limit.clamp(1, self.limits.max_list_limit);

        let expiry = self.email.invite_expiry_hours.clamp(1, MAX_INVITE_EXPIRY_HOURS);
        if expiry != self.email.invite_expiry_hours {
            tracing::warn!(
                "INVITE_EXPIRY_HOURS must be between 1 and {}, using {}",
                MAX_INVITE_EXPIRY_HOURS,
                expiry
            );
            self.email.invite_expiry_hours = expiry;
        }
        self
    }

    /// Copy of the configuration that is safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(url) = copy.database.url.as_mut() {
            if let Ok(mut parsed) = url::Url::parse(url) {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some(REDACTED));
                }
                *url = parsed.to_string();
            }
        }
        if !copy.platform.service_role_key.is_empty() {
            copy.platform.service_role_key = REDACTED.to_string();
        }
        if !copy.platform.jwt_secret.is_empty() {
            copy.platform.jwt_secret = REDACTED.to_string();
        }
        if copy.email.resend_api_key.is_some() {
            copy.email.resend_api_key = Some(REDACTED.to_string());
        }
        if copy.email.sendgrid_api_key.is_some() {
            copy.email.sendgrid_api_key = Some(REDACTED.to_string());
        }
        copy
    }

    fn limits() -> LimitsConfig {
        LimitsConfig {
            max_list_limit: 1000,
            default_list_limit: 100,
            bulk_users_max: 100,
            bulk_benchmarks_max: 500,
            logo_max_bytes: 2 * 1024 * 1024,       // 2MB
            background_max_bytes: 5 * 1024 * 1024, // 5MB
        }
    }

    fn platform() -> PlatformConfig {
        PlatformConfig {
            url: "http://localhost:54321".to_string(),
            service_role_key: String::new(),
            jwt_secret: String::new(),
            storage_bucket: "client-assets".to_string(),
            http_timeout_secs: 15,
        }
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                max_request_size_bytes: 12 * 1024 * 1024, // 12MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            platform: Self::platform(),
            email: EmailConfig {
                from_address: "no-reply@localhost".to_string(),
                providers: vec![EmailProviderKind::Log],
                resend_api_key: None,
                sendgrid_api_key: None,
                app_url: "http://localhost:5173".to_string(),
                invite_expiry_hours: 72,
            },
            limits: Self::limits(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                max_request_size_bytes: 12 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            platform: Self::platform(),
            email: EmailConfig {
                from_address: "no-reply@staging.example.com".to_string(),
                providers: vec![EmailProviderKind::Resend, EmailProviderKind::Sendgrid, EmailProviderKind::Log],
                resend_api_key: None,
                sendgrid_api_key: None,
                app_url: "https://staging.example.com".to_string(),
                invite_expiry_hours: 72,
            },
            limits: Self::limits(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                max_request_size_bytes: 12 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            platform: Self::platform(),
            email: EmailConfig {
                from_address: "no-reply@example.com".to_string(),
                providers: vec![EmailProviderKind::Resend, EmailProviderKind::Sendgrid],
                resend_api_key: None,
                sendgrid_api_key: None,
                app_url: "https://app.example.com".to_string(),
                invite_expiry_hours: 72,
            },
            limits: LimitsConfig {
                max_list_limit: 500,
                ..Self::limits()
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.email.providers, vec![EmailProviderKind::Log]);
        assert_eq!(config.limits.logo_max_bytes, 2 * 1024 * 1024);
        assert_eq!(config.limits.background_max_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.limits.max_list_limit, 500);
        assert!(!config.email.providers.contains(&EmailProviderKind::Log));
    }

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!(EmailProviderKind::parse(" Resend "), Some(EmailProviderKind::Resend));
        assert_eq!(EmailProviderKind::parse("SENDGRID"), Some(EmailProviderKind::Sendgrid));
        assert_eq!(EmailProviderKind::parse("pigeon"), None);
    }

    #[test]
    fn out_of_range_overrides_are_normalized() {
        let mut config = AppConfig::development();
        config.limits.max_list_limit = 0;
        config.email.invite_expiry_hours = i64::MAX;

        let config = config.normalized();
        assert_eq!(config.limits.max_list_limit, 1);
        assert_eq!(config.limits.default_list_limit, 1);
        assert_eq!(config.email.invite_expiry_hours, MAX_INVITE_EXPIRY_HOURS);

        let mut config = AppConfig::development();
        config.email.invite_expiry_hours = -3;
        assert_eq!(config.normalized().email.invite_expiry_hours, 1);
    }

    #[test]
    fn redacted_hides_secrets() {
        let mut config = AppConfig::development();
        config.platform.jwt_secret = "s3cret".to_string();
        config.email.resend_api_key = Some("re_123".to_string());
        config.database.url = Some("postgres://app:hunter2@db:5432/postgres".to_string());

        let redacted = config.redacted();
        assert_eq!(redacted.platform.jwt_secret, REDACTED);
        assert_eq!(redacted.email.resend_api_key.as_deref(), Some(REDACTED));
        let url = redacted.database.url.unwrap_or_default();
        assert!(!url.contains("hunter2"));
    }
}
