use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, Map};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// `URL_BD`: PostgreSQL connection string.
    pub url_bd: SecretString,
    #[serde(default = "default_port", deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(
        default = "default_max_connections",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub max_connections: u32,
    /// `DB_ACQUIRE_TIMEOUT_SECS`: how long a statement waits for a connection.
    #[serde(
        default = "default_acquire_timeout_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub db_acquire_timeout_secs: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::load(Environment::default())
    }

    /// Reads settings from an explicit set of variables instead of the process
    /// environment.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(Environment::default().source(Some(vars)))
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }
}
