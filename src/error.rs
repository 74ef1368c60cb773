use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// No customer identity has been established, so a session cannot start.
    #[error("Customer session unavailable: {0}")]
    CustomerSessionUnavailable(String),
    #[error("Invalid flow signal: {0}")]
    InvalidSignal(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, SessionError>;
