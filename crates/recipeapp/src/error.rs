use crate::store::BackendKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecipeError {
    /// The interchange text is structurally broken as a whole (e.g. a quoted
    /// field is still open at end of input). The in-memory set is left unchanged.
    #[error("Malformed interchange text: unterminated quoted field starting on line {line}")]
    MalformedInterchange { line: usize },

    #[error("No writable backend is active; the store is read-only")]
    NoWritableBackend,

    #[error("Write to {backend} backend failed: {reason}")]
    BackendWriteFailed { backend: BackendKind, reason: String },

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Recipe not found: {0}")]
    RecordNotFound(String),

    #[error("The {0} backend has no asset area")]
    AssetAreaUnavailable(BackendKind),

    #[error("Directory is not usable as a recipe store: {0}")]
    DirectoryUnavailable(String),

    #[error("Backends were already probed for this store")]
    AlreadyProbed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl RecipeError {
    /// Wrap a lower-level failure that happened while writing through `backend`.
    pub fn write_failed(backend: BackendKind, reason: impl std::fmt::Display) -> Self {
        RecipeError::BackendWriteFailed {
            backend,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecipeError>;
