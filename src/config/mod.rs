use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Secret shipped in development presets. Never acceptable in production.
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-change-in-production";

/// Upper bound on `SECURITY_TOKEN_TTL_MINUTES` (10 years)
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. When unset the server runs on the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Echo the stub verification code back from /auth/send-code
    pub expose_dev_code: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub secret_key: String,
    pub token_ttl_minutes: i64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SECRET_KEY must not be empty")]
    EmptySecret,

    #[error("SECRET_KEY must be changed from the default in production")]
    DefaultSecretInProduction,

    #[error("token TTL must be positive, got {0} minutes")]
    InvalidTokenTtl(i64),

    #[error("token TTL must be at most {max} minutes, got {minutes}")]
    TokenTtlTooLong { minutes: i64, max: i64 },
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        Self::for_environment(environment).with_env_overrides()
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_HOST") {
            self.api.host = v;
        }
        if let Some(port) = env::var("API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_EXPOSE_DEV_CODE") {
            self.api.expose_dev_code = v.parse().unwrap_or(self.api.expose_dev_code);
        }

        // Security overrides
        if let Ok(v) = env::var("SECRET_KEY") {
            self.security.secret_key = v;
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_TTL_MINUTES") {
            self.security.token_ttl_minutes = v.parse().unwrap_or(self.security.token_ttl_minutes);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Reject configurations the server must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.secret_key.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.environment == Environment::Production
            && self.security.secret_key == DEFAULT_SECRET_KEY
        {
            return Err(ConfigError::DefaultSecretInProduction);
        }
        if self.security.token_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidTokenTtl(self.security.token_ttl_minutes));
        }
        if self.security.token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(ConfigError::TokenTtlTooLong {
                minutes: self.security.token_ttl_minutes,
                max: MAX_TOKEN_TTL_MINUTES,
            });
        }
        Ok(())
    }

    /// Token lifetime, clamped to `1..=MAX_TOKEN_TTL_MINUTES` for unvalidated configs
    pub fn token_ttl(&self) -> TimeDelta {
        let minutes = self
            .security
            .token_ttl_minutes
            .clamp(1, MAX_TOKEN_TTL_MINUTES);
        TimeDelta::minutes(minutes)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                expose_dev_code: true,
            },
            security: SecurityConfig {
                secret_key: DEFAULT_SECRET_KEY.to_string(),
                token_ttl_minutes: 60 * 24 * 7, // 7 days
                enable_cors: true,
                cors_origins: Vec::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                expose_dev_code: true,
            },
            security: SecurityConfig {
                secret_key: DEFAULT_SECRET_KEY.to_string(),
                token_ttl_minutes: 60 * 24 * 7,
                enable_cors: true,
                cors_origins: vec!["https://staging.doggymeetup.app".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                expose_dev_code: false,
            },
            security: SecurityConfig {
                secret_key: DEFAULT_SECRET_KEY.to_string(),
                token_ttl_minutes: 60 * 24 * 7,
                enable_cors: true,
                cors_origins: vec!["https://doggymeetup.app".to_string()],
            },
        }
    }
}
