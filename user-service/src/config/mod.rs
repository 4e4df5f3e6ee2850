use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct UserConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub mongodb: MongoConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    fn from_env() -> Self {
        match env::var("ENVIRONMENT").as_deref() {
            Ok("prod") | Ok("production") => Environment::Prod,
            _ => Environment::Dev,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection string; may carry credentials, so it is never logged.
    pub uri: Secret<String>,
    pub database: String,
    pub collection: String,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl UserConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let environment = Environment::from_env();
        let is_prod = environment == Environment::Prod;

        let connect_timeout_secs = get_env("MONGODB_CONNECT_TIMEOUT_SECS", Some("5"), false)?
            .parse()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "MONGODB_CONNECT_TIMEOUT_SECS must be a whole number of seconds: {}",
                    e
                ))
            })?;

        let config = UserConfig {
            common,
            environment,
            mongodb: MongoConfig {
                uri: Secret::new(get_env(
                    "MONGODB_URI",
                    Some("mongodb://localhost:27017"),
                    is_prod,
                )?),
                database: get_env("MONGODB_DATABASE", Some("userdb"), false)?,
                collection: get_env("MONGODB_COLLECTION", Some("users"), false)?,
                connect_timeout_secs,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    is_prod,
                )?),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.environment == Environment::Prod && self.cors.allows_any_origin() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "CORS_ALLOWED_ORIGINS must list explicit origins in production"
            )));
        }
        if self.mongodb.connect_timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "MONGODB_CONNECT_TIMEOUT_SECS must be greater than zero"
            )));
        }
        Ok(())
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read `key`, falling back to `default` unless `strict` demands an explicit value.
fn get_env(key: &str, default: Option<&str>, strict: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if strict {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
