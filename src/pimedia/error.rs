use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A metadata record points at a physical entry that is gone.
    #[error("Orphaned record: {0}")]
    OrphanedRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl MediaError {
    /// Short, stable name of the error kind, for callers that map kinds to status codes.
    pub fn kind(&self) -> &'static str {
        match self {
            MediaError::InvalidPath(_) => "invalid_path",
            MediaError::NotFound(_) => "not_found",
            MediaError::AlreadyExists(_) => "already_exists",
            MediaError::OrphanedRecord(_) => "orphaned_record",
            MediaError::Io(_) => "io_failure",
            MediaError::Serialization(_) => "serialization",
            MediaError::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, MediaError>;
