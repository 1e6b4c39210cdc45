use super::*;
use crate::errors::StorageError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Mutex;

pub const DEFAULT_JSON_PATH: &str = "./.instance/contacts.json";

type Document = BTreeMap<String, Vec<Contact>>;

/// Embedded store: one JSON object mapping each owner id to its contact list,
/// rewritten whole on every mutation.
pub struct JsonStorage {
    pub path: PathBuf,
    file_lock: Mutex<()>,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Document, AppError> {
        if !fs::exists(&self.path)? {
            return Ok(Document::new());
        }

        let mut file = OpenOptions::new().read(true).open(&self.path)?;
        let mut data = String::new();
        file.read_to_string(&mut data)?;

        // serde_json will give an error if data is empty
        if data.trim().is_empty() {
            return Ok(Document::new());
        }

        let value: Value = serde_json::from_str(&data)?;
        if !value.is_object() {
            return Err(AppError::Storage(StorageError::Malformed(format!(
                "{} is not an object keyed by user id",
                self.path.display()
            ))));
        }
        Ok(serde_json::from_value(value)?)
    }

    fn save(&self, document: &Document) -> Result<(), AppError> {
        create_file_parent(&self.path)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;

        let json = serde_json::to_string_pretty(document)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Runs `f` on the loaded document and writes it back when `f` reports a change.
    fn mutate<F>(&self, f: F) -> Result<bool, AppError>
    where
        F: FnOnce(&mut Document) -> bool,
    {
        let _guard = self.file_lock.lock()?;
        let mut document = self.load()?;
        let changed = f(&mut document);
        if changed {
            self.save(&document)?;
        }
        Ok(changed)
    }
}

impl ContactStorage for JsonStorage {
    fn medium(&self) -> &str {
        "json"
    }

    fn scan(&self, owner: &str) -> Result<Vec<Contact>, AppError> {
        let _guard = self.file_lock.lock()?;
        let mut document = self.load()?;
        Ok(document.remove(owner).unwrap_or_default())
    }

    fn insert(&self, owner: &str, contact: &Contact) -> Result<(), AppError> {
        self.mutate(|doc| {
            doc.entry(owner.to_string())
                .or_default()
                .push(contact.clone());
            true
        })?;
        Ok(())
    }

    fn update(&self, owner: &str, contact: &Contact) -> Result<bool, AppError> {
        self.mutate(|doc| {
            match doc
                .get_mut(owner)
                .and_then(|list| list.iter_mut().find(|c| c.id == contact.id))
            {
                Some(existing) => {
                    *existing = contact.clone();
                    true
                }
                None => false,
            }
        })
    }

    fn remove(&self, owner: &str, id: &str) -> Result<bool, AppError> {
        self.mutate(|doc| {
            let Some(list) = doc.get_mut(owner) else {
                return false;
            };
            let before = list.len();
            list.retain(|c| c.id != id);
            list.len() != before
        })
    }
}
