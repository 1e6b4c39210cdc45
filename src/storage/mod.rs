pub mod json;
pub mod memory;
pub mod remote;

use crate::config::Config;
use crate::prelude::{AppError, Contact};
use std::fs;
use std::path::Path;

/// Capability every persistence medium offers. All operations are scoped by
/// the owning user id; ids are unique within an owner.
pub trait ContactStorage: Send + Sync {
    fn medium(&self) -> &str;

    /// All contacts of `owner` in insertion order.
    fn scan(&self, owner: &str) -> Result<Vec<Contact>, AppError>;

    fn insert(&self, owner: &str, contact: &Contact) -> Result<(), AppError>;

    /// Replaces the stored contact with the same id. `false` when absent.
    fn update(&self, owner: &str, contact: &Contact) -> Result<bool, AppError>;

    /// `false` when no contact with `id` exists for `owner`.
    fn remove(&self, owner: &str, id: &str) -> Result<bool, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMedium {
    Mem,
    Json,
    Remote,
}

impl StorageMedium {
    pub fn is_which(&self) -> &str {
        match self {
            StorageMedium::Mem => "mem",
            StorageMedium::Json => "json",
            StorageMedium::Remote => "remote",
        }
    }

    pub fn from(str: &str) -> Result<Self, AppError> {
        match str.trim().to_lowercase().as_str() {
            "mem" => Ok(StorageMedium::Mem),
            "json" => Ok(StorageMedium::Json),
            "remote" => Ok(StorageMedium::Remote),
            _ => Err(AppError::Validation(
                "Not a recognized storage medium".to_string(),
            )),
        }
    }
}

pub fn parse_storage_type(config: &Config) -> Result<Box<dyn ContactStorage>, AppError> {
    match config.storage {
        StorageMedium::Mem => Ok(Box::new(memory::MemoryStorage::new())),
        StorageMedium::Json => Ok(Box::new(json::JsonStorage::new(&config.json_path))),
        StorageMedium::Remote => {
            let base_url = config
                .remote_url
                .as_deref()
                .ok_or(AppError::NotFound("REMOTE_STORAGE_URL".to_string()))?;
            Ok(Box::new(remote::RemoteStorage::new(
                base_url,
                config.remote_api_key.clone(),
            )?))
        }
    }
}

pub fn create_file_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
