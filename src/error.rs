use thiserror::Error;

/// Canonical error type shared by the store backends and the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The backend rejected a read, write, or clear.
    #[error("store failure: {0}")]
    Store(String),

    /// I/O failure in a file-backed store.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// A file-backed store could not encode or decode its document.
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The text stored under a key does not parse as a number.
    #[error("value for key {key:?} is not numeric: {text:?}")]
    Decode { key: String, text: String },
}
