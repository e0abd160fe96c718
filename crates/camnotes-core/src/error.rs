use thiserror::Error;

/// Top-level error type for the Camera Notes journal.
///
/// Pure helpers (tag extraction, queries) never produce these; they degrade
/// to empty results instead. Store operations return them unchanged to the
/// caller, which owns user-visible messaging.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CamNotesError {
    #[error("Persistence read error: {0}")]
    PersistenceRead(String),

    #[error("Persistence write error: {0}")]
    PersistenceWrite(String),

    #[error("Photo not found: {id}")]
    NotFound { id: String },

    #[error("Invalid import: {0}")]
    InvalidImport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CamNotesError {
    pub fn not_found(id: impl Into<String>) -> Self {
        CamNotesError::NotFound { id: id.into() }
    }
}

impl From<toml::de::Error> for CamNotesError {
    fn from(err: toml::de::Error) -> Self {
        CamNotesError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CamNotesError {
    fn from(err: toml::ser::Error) -> Self {
        CamNotesError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CamNotesError {
    fn from(err: serde_json::Error) -> Self {
        CamNotesError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for journal operations.
pub type Result<T> = std::result::Result<T, CamNotesError>;
