mod application;
mod database;
mod environment;

pub use application::ApplicationConfig;
pub use database::{DatabaseConfig, DbConnectionOptions};
use environment::Environment;

use serde::Deserialize;

/// Which backend holds subscriber documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub application: ApplicationConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageKind,
}

impl Config {
    /// Layers `config/base.yaml`, `config/<APP_ENVIRONMENT>.yaml` and `APP_*`
    /// environment variables, e.g. `APP_DATABASE__URL`.
    pub fn init() -> Result<Self, config::ConfigError> {
        let base_path = std::env::current_dir()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        let config_directory = base_path.join("config");
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(config::ConfigError::Message)?;
        tracing::info!("Application environment = {:?}", environment);
        let config_file = format!("{}.yaml", environment.as_str());
        config::Config::builder()
            .add_source(config::File::from(config_directory.join("base.yaml")))
            .add_source(config::File::from(config_directory.join(config_file)))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Self>()
    }
}
