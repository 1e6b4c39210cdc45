pub use crate::cli::{command, run_app};
pub use crate::config::Config;
pub use crate::domain::{
    contact::{self, Contact, ContactPatch, NewContact},
    manager::ContactManager,
    search::{SortMode, DEFAULT_REMINDER_WINDOW_SECS},
};
pub use crate::errors::{AppError, StorageError};
pub use crate::interchange::{CsvDialect, ImportSummary};
pub use crate::storage::{
    self, ContactStorage, StorageMedium, json::JsonStorage, memory::MemoryStorage,
    remote::RemoteStorage,
};
