pub mod contact;
pub mod dedup;
pub mod manager;
pub mod search;

use crate::errors::AppError;
pub use chrono::{DateTime, Utc};
