use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::{AdminAccount, UserProfile};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub scoring: ScoringConfig,
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub admins: Vec<AdminAccount>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// Reject negative amounts instead of scoring them as given
    pub reject_negative_amounts: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub recent_limit: usize,
}

impl Config {
    /// Builder carrying every default except the JWT secret
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            // Server defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("server.workers", 4)?
            // Auth defaults
            .set_default("auth.token_ttl_hours", 8)?
            // Scoring defaults
            .set_default("scoring.reject_negative_amounts", false)?
            // Dashboard defaults
            .set_default("dashboard.recent_limit", 20)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env::var("FRAUD_API_CONFIG").unwrap_or_else(|_| "config/fraud-api".to_string());

        let mut builder = Self::defaults()?
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("FRAUD_API").separator("__"));

        // Override from environment variables
        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        if let Ok(secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("auth.jwt_secret", secret)?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Message("Missing JWT_SECRET".to_string()));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Message(
                "auth.token_ttl_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
