use super::BackendKind;
use crate::error::{RecipeError, Result};
use std::path::{Path, PathBuf};

/// Abstract interface for one storage substrate.
/// Drivers only move whole interchange texts around; RecipeStore owns
/// decoding, normalization and the in-memory set.
pub trait StorageBackend: Send {
    fn kind(&self) -> BackendKind;

    /// Check whether the substrate is usable right now (exists, is writable).
    /// Must not create user-visible state beyond what the driver owns.
    fn probe(&self) -> bool;

    fn is_writable(&self) -> bool {
        self.kind().is_writable()
    }

    /// Read the complete interchange text.
    /// Returns Ok(None) when nothing has been stored yet.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_all(&self) -> Result<Option<String>>;

    /// Replace the complete interchange text.
    /// MUST be atomic: after an interruption readers see either the old or the
    /// new text in full.
    fn write_all(&self, text: &str) -> Result<()>;

    /// Create (if needed) and return a named sub-area, e.g. `images`.
    /// Only hierarchical substrates support this; it is used for assets, never
    /// for the record text.
    fn ensure_sub_area(&self, _name: &str) -> Result<AreaHandle> {
        Err(RecipeError::AssetAreaUnavailable(self.kind()))
    }

    /// Human readable location, for status output.
    fn location(&self) -> String;
}

/// A directory inside a hierarchical backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaHandle {
    name: String,
    backend_root: PathBuf,
}

impl AreaHandle {
    pub fn new(backend_root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend_root: backend_root.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the area.
    pub fn path(&self) -> PathBuf {
        self.backend_root.join(&self.name)
    }

    /// Root the backend-relative references are resolved against.
    pub fn backend_root(&self) -> &Path {
        &self.backend_root
    }

    /// Backend-relative reference for a file inside this area (`images/x.png`).
    pub fn reference_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.name, file_name)
    }
}
