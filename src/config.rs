use crate::interchange::CsvDialect;
use crate::prelude::AppError;
use crate::storage::{StorageMedium, json::DEFAULT_JSON_PATH};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Runtime settings, read from the process environment and an optional `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageMedium,
    pub json_path: PathBuf,
    pub remote_url: Option<String>,
    pub remote_api_key: Option<String>,
    pub csv_dialect: CsvDialect,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageMedium::Json,
            json_path: PathBuf::from(DEFAULT_JSON_PATH),
            remote_url: None,
            remote_api_key: None,
            csv_dialect: CsvDialect::Legacy,
        }
    }
}

impl Config {
    /// Reads `STORAGE_CHOICE`, `JSON_STORAGE_PATH`, `REMOTE_STORAGE_URL`,
    /// `REMOTE_API_KEY` and `CSV_DIALECT`. Unset keys keep their defaults.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        Self::from_lookup(get_env_value_by_key)
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(choice) = lookup("STORAGE_CHOICE") {
            config.storage = StorageMedium::from(&choice)?;
        }
        if let Some(path) = lookup("JSON_STORAGE_PATH") {
            config.json_path = PathBuf::from(path);
        }
        config.remote_url = lookup("REMOTE_STORAGE_URL");
        config.remote_api_key = lookup("REMOTE_API_KEY");
        if let Some(dialect) = lookup("CSV_DIALECT") {
            config.csv_dialect = CsvDialect::from(&dialect)?;
        }

        Ok(config)
    }
}

/// Value of `key`, treating blank values as unset.
pub fn get_env_value_by_key(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
