/// Failures of the underlying key-value storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage full: {needed} bytes needed, {capacity} available")]
    Full { needed: usize, capacity: usize },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during save/load operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode project: {0}")]
    Encode(String),

    #[error("malformed project data: {0}")]
    Decode(String),
}
