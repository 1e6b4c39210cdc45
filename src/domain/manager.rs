use super::contact::{Contact, ContactPatch, NewContact, generate_id, next_timestamp};
use super::dedup::{DuplicateKey, find_duplicate};
use super::search::{SortMode, due_reminders, filter_contacts, sort_contacts};
use super::*;
use crate::config::Config;
use crate::interchange::{self, CsvDialect, ImportSummary};
use crate::storage::{self, ContactStorage};

use chrono::Duration;
use log::{debug, info, warn};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Owns the contact collections of every user behind one persistence medium
/// and rejects duplicate keys on every write.
///
/// Writes for the same user are serialized by a per-user lock, so the
/// duplicate check and the write that follows it cannot interleave with
/// another write for that user.
pub struct ContactManager {
    storage: Box<dyn ContactStorage>,
    dialect: CsvDialect,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ContactManager {
    pub fn new(storage: Box<dyn ContactStorage>) -> Self {
        Self {
            storage,
            dialect: CsvDialect::default(),
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        debug!("opening {} storage", config.storage.is_which());
        let storage = storage::parse_storage_type(config)?;
        Ok(Self::new(storage).with_dialect(config.csv_dialect))
    }

    pub fn with_dialect(mut self, dialect: CsvDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn medium(&self) -> &str {
        self.storage.medium()
    }

    pub fn dialect(&self) -> CsvDialect {
        self.dialect
    }

    /// Lock shared by every in-flight write for `owner`. Entries nobody holds
    /// are dropped here, so the map only grows with concurrent users.
    fn user_lock(&self, owner: &str) -> Result<Arc<Mutex<()>>, AppError> {
        let mut locks = self.user_locks.lock()?;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Ok(Arc::clone(locks.entry(owner.to_string()).or_default()))
    }

    pub fn create(&self, user_id: &str, payload: NewContact) -> Result<Contact, AppError> {
        let owner = owner(user_id)?;
        let lock = self.user_lock(owner)?;
        let _guard = lock.lock()?;

        self.create_locked(owner, payload)
    }

    /// Create body; the caller holds the lock for `owner`.
    fn create_locked(&self, owner: &str, payload: NewContact) -> Result<Contact, AppError> {
        let payload = payload.normalized()?;
        let existing = self.storage.scan(owner)?;

        let key = DuplicateKey {
            name: &payload.name,
            email: payload.email.as_deref(),
            phone: payload.phone.as_deref(),
        };
        if let Some((other, reason)) = find_duplicate(&key, &existing, None) {
            warn!("create rejected for user {owner}: collides with contact {}", other.id);
            return Err(AppError::Duplicate(reason.message().to_string()));
        }

        let contact = payload.into_contact(generate_id(), Utc::now());
        self.storage.insert(owner, &contact)?;

        info!("created contact {} for user {owner}", contact.id);
        Ok(contact)
    }

    pub fn get(&self, user_id: &str, id: &str) -> Result<Contact, AppError> {
        let owner = owner(user_id)?;
        self.storage
            .scan(owner)?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(AppError::NotFound("Contact".to_string()))
    }

    pub fn update(&self, user_id: &str, id: &str, patch: ContactPatch) -> Result<Contact, AppError> {
        let owner = owner(user_id)?;
        let lock = self.user_lock(owner)?;
        let _guard = lock.lock()?;

        let existing = self.storage.scan(owner)?;
        let current = existing
            .iter()
            .find(|c| c.id == id)
            .ok_or(AppError::NotFound("Contact".to_string()))?;

        let mut updated = patch.merge_into(current)?;

        if let Some((other, reason)) = find_duplicate(&DuplicateKey::of(&updated), &existing, Some(id))
        {
            warn!("update of contact {id} rejected for user {owner}: collides with contact {}", other.id);
            return Err(AppError::Duplicate(format!(
                "Update would create a duplicate. {}",
                reason.message()
            )));
        }

        updated.updated_at = next_timestamp(current.updated_at);

        if !self.storage.update(owner, &updated)? {
            return Err(AppError::NotFound("Contact".to_string()));
        }

        info!("updated contact {id} for user {owner}");
        Ok(updated)
    }

    /// Hard delete. A missing contact is `NotFound`, so a second delete of the
    /// same id fails.
    pub fn delete(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let owner = owner(user_id)?;
        let lock = self.user_lock(owner)?;
        let _guard = lock.lock()?;

        if !self.storage.remove(owner, id)? {
            return Err(AppError::NotFound("Contact".to_string()));
        }

        info!("deleted contact {id} for user {owner}");
        Ok(())
    }

    pub fn list(&self, user_id: &str) -> Result<Vec<Contact>, AppError> {
        let owner = owner(user_id)?;
        self.storage.scan(owner)
    }

    /// `list` narrowed by `term` and ordered by `sort`.
    pub fn search(&self, user_id: &str, term: &str, sort: SortMode) -> Result<Vec<Contact>, AppError> {
        let contacts = self.list(user_id)?;
        let mut matches = filter_contacts(&contacts, term);
        sort_contacts(&mut matches, sort);
        Ok(matches.into_iter().cloned().collect())
    }

    pub fn due_reminders(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Vec<Contact>, AppError> {
        let contacts = self.list(user_id)?;
        Ok(due_reminders(&contacts, now, window)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Creates one contact per CSV row through the duplicate-checked path.
    /// A failing row is counted as skipped; it never aborts the import.
    pub fn import_csv(&self, user_id: &str, text: &str) -> Result<ImportSummary, AppError> {
        let owner = owner(user_id)?;
        let rows = interchange::parse_rows(text, self.dialect)?;

        let lock = self.user_lock(owner)?;
        let _guard = lock.lock()?;

        let mut summary = ImportSummary::default();
        for (line, row) in rows.into_iter().enumerate() {
            match row.and_then(|payload| self.create_locked(owner, payload)) {
                Ok(_) => summary.imported += 1,
                Err(AppError::Storage(e)) => {
                    warn!("import row {} skipped for user {owner}: {e}", line + 1);
                    summary.skipped += 1;
                }
                Err(e) => {
                    debug!("import row {} skipped for user {owner}: {e}", line + 1);
                    summary.skipped += 1;
                }
            }
        }

        info!(
            "imported {} contacts for user {owner}, skipped {}",
            summary.imported, summary.skipped
        );
        Ok(summary)
    }

    pub fn export_csv(&self, user_id: &str) -> Result<String, AppError> {
        let contacts = self.list(user_id)?;
        interchange::export_contacts(&contacts, self.dialect)
    }
}

/// Rejects an unresolved identity before any storage access. A non-blank id
/// is used exactly as given.
fn owner(user_id: &str) -> Result<&str, AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::NotAuthenticated);
    }
    Ok(user_id)
}
