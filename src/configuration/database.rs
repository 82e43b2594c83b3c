use std::{str::FromStr, time::Duration};

use secrecy::{ExposeSecret, Secret};
use serde::{de, Deserialize, Deserializer};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    ConnectOptions,
};

use crate::DbPool;

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(rename = "url")]
    pub options: DbConnectionOptions,
    #[serde(default)]
    pub require_ssl: bool,
    #[serde(
        default = "default_acquire_timeout",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub migrate_on_startup: bool,
}

fn default_acquire_timeout() -> u64 {
    2
}

#[derive(Clone, Debug)]
pub struct DbConnectionOptions {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub database: String,
}

impl DatabaseConfig {
    /// Connects to the server's maintenance database, for creating or dropping
    /// the application database.
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.options.host)
            .port(self.options.port)
            .username(&self.options.username)
            .password(self.options.password.expose_secret())
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        let mut options = self.without_db().database(&self.options.database);
        options.log_statements(tracing::log::LevelFilter::Trace);
        options
    }

    /// The pool connects on first use, so building it never touches the network.
    pub fn lazy_pool(&self) -> DbPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .connect_lazy_with(self.with_db())
    }
}

impl FromStr for DbConnectionOptions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use regex::Regex;
        let rg = Regex::new(r"^postgres(?:ql)?://(.+):(.+)@(.+):([0-9]+)/(.+)$")
            .map_err(|e| e.to_string())?;
        let captures = rg
            .captures(s)
            .ok_or("Database URL did not match the expected format.")?;
        Ok(DbConnectionOptions {
            username: captures[1].into(),
            password: Secret::new(captures[2].into()),
            host: captures[3].into(),
            port: captures[4].parse().map_err(|_| "Invalid port value.")?,
            database: captures[5].into(),
        })
    }
}

impl<'de> Deserialize<'de> for DbConnectionOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let url = &String::deserialize(deserializer)?;
        Self::from_str(url).map_err(de::Error::custom)
    }
}
