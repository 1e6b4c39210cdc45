use core::fmt;

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Duplicate(String),
    NotFound(String),
    NotAuthenticated,
    Storage(StorageError),
}

/// Failures of the persistence medium itself, kept apart from the domain errors.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Request(reqwest::Error),
    Status(u16),
    Malformed(String),
    Poisoned,
}

impl AppError {
    /// HTTP status a web transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::Duplicate(_) => 400,
            AppError::NotAuthenticated => 401,
            AppError::NotFound(_) => 404,
            AppError::Storage(_) => 500,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, AppError::Duplicate(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(StorageError::Io(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(StorageError::Json(err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Storage(StorageError::Csv(err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Storage(StorageError::Request(err))
    }
}

impl<T> From<std::sync::PoisonError<T>> for AppError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        AppError::Storage(StorageError::Poisoned)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::Duplicate(msg) => write!(f, "Duplicate contact: {}", msg),
            AppError::NotFound(item) => write!(f, "{} Not found", item),
            AppError::NotAuthenticated => write!(f, "User not authenticated"),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => {
                write!(f, "I/O error while accessing a file or resource: {}", e)
            }
            StorageError::Json(e) => write!(f, "malformed JSON document: {}", e),
            StorageError::Csv(e) => write!(f, "CSV error: {}", e),
            StorageError::Request(e) => write!(f, "request to remote storage failed: {}", e),
            StorageError::Status(code) => {
                write!(f, "remote storage answered with status {}", code)
            }
            StorageError::Malformed(what) => write!(f, "malformed store: {}", what),
            StorageError::Poisoned => write!(f, "storage lock poisoned"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Json(e) => Some(e),
            StorageError::Csv(e) => Some(e),
            StorageError::Request(e) => Some(e),
            StorageError::Status(_) | StorageError::Malformed(_) | StorageError::Poisoned => None,
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Storage(e) => Some(e),
            _ => None,
        }
    }
}
