use super::*;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local storage. Nothing survives the process; used by tests and
/// the `mem` storage choice.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, Vec<Contact>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, bypassing duplicate checks. Benchmarks and fixtures only.
    pub fn with_contacts(owner: &str, contacts: Vec<Contact>) -> Self {
        let mut data = HashMap::new();
        data.insert(owner.to_string(), contacts);
        Self {
            data: RwLock::new(data),
        }
    }
}

impl ContactStorage for MemoryStorage {
    fn medium(&self) -> &str {
        "mem"
    }

    fn scan(&self, owner: &str) -> Result<Vec<Contact>, AppError> {
        let data = self.data.read()?;
        Ok(data.get(owner).cloned().unwrap_or_default())
    }

    fn insert(&self, owner: &str, contact: &Contact) -> Result<(), AppError> {
        let mut data = self.data.write()?;
        data.entry(owner.to_string())
            .or_default()
            .push(contact.clone());
        Ok(())
    }

    fn update(&self, owner: &str, contact: &Contact) -> Result<bool, AppError> {
        let mut data = self.data.write()?;
        let slot = data
            .get_mut(owner)
            .and_then(|list| list.iter_mut().find(|c| c.id == contact.id));

        match slot {
            Some(existing) => {
                *existing = contact.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, owner: &str, id: &str) -> Result<bool, AppError> {
        let mut data = self.data.write()?;
        let Some(list) = data.get_mut(owner) else {
            return Ok(false);
        };

        let before = list.len();
        list.retain(|c| c.id != id);
        Ok(list.len() != before)
    }
}
