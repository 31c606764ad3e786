use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("unknown STORAGE backend '{0}' (expected 'postgres' or 'memory')")]
    UnknownStorage(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub bootstrap: Option<AdminBootstrap>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub storage: Storage,
    pub url: Option<String>,
    pub pool_size: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_hours: i64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub bcrypt_cost: u32,
}

/// Admin account created at startup when it does not exist yet.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

/// Flat view of the environment, one field per variable (lowercased).
#[derive(Debug, Deserialize)]
struct Env {
    host: String,
    port: u16,
    environment: String,
    rust_log: String,
    log_format: String,
    storage: String,
    database_url: Option<String>,
    db_pool_size: u32,
    jwt_secret: Option<String>,
    jwt_expires_in_hours: i64,
    bcrypt_cost: u32,
    admin_username: Option<String>,
    admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::default())
    }

    /// Values stay strings until deserialization, so secrets such as
    /// `007` keep their leading zeros; numeric fields are parsed from them.
    fn load(source: config::Environment) -> Result<Self, ConfigError> {
        let env: Env = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("environment", "development")?
            .set_default("rust_log", "theater_booking=debug,tower_http=debug")?
            .set_default("log_format", "pretty")?
            .set_default("storage", "postgres")?
            .set_default("db_pool_size", 20)?
            .set_default("jwt_expires_in_hours", 24)?
            .set_default("bcrypt_cost", 12)?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        Self::from_parts(env)
    }

    fn from_parts(env: Env) -> Result<Self, ConfigError> {
        let storage = match env.storage.to_ascii_lowercase().as_str() {
            "postgres" => Storage::Postgres,
            "memory" => Storage::Memory,
            other => return Err(ConfigError::UnknownStorage(other.to_string())),
        };
        if storage == Storage::Postgres && env.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let log_format = if env.log_format.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        };

        let bootstrap = match (env.admin_username, env.admin_password) {
            (Some(username), Some(password)) => Some(AdminBootstrap { username, password }),
            _ => None,
        };

        Ok(Config {
            app: AppConfig {
                host: env.host,
                port: env.port,
                environment: env.environment,
                rust_log: env.rust_log,
                log_format,
            },
            database: DatabaseConfig {
                storage,
                url: env.database_url,
                pool_size: env.db_pool_size,
            },
            jwt: JwtConfig {
                secret: env.jwt_secret.ok_or(ConfigError::Missing("JWT_SECRET"))?,
                expires_in_hours: env.jwt_expires_in_hours,
            },
            security: SecurityConfig {
                bcrypt_cost: env.bcrypt_cost,
            },
            bootstrap,
        })
    }

    /// In-memory configuration for tests and local experiments.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
                rust_log: "theater_booking=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            database: DatabaseConfig {
                storage: Storage::Memory,
                url: None,
                pool_size: 1,
            },
            jwt: JwtConfig {
                secret: jwt_secret.to_string(),
                expires_in_hours: 24,
            },
            // bcrypt's minimum cost
            security: SecurityConfig { bcrypt_cost: 4 },
            bootstrap: None,
        }
    }
}
