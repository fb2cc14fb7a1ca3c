use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::sql::DatabaseConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let database = DatabaseConfig::from_env()?; // Required - will fail if DATABASE_URL is not set
        let jwt = JwtConfig::from_env()?; // Required - will fail if JWT_SECRET is not set

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            jwt,
        })
    }
}
