use super::backend::{AreaHandle, StorageBackend};
use super::fs_backend::FileArea;
use super::BackendKind;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// A user-chosen directory. Only ever active after an explicit grant; the
/// directory must already exist and be writable.
pub struct DirectoryBackend {
    area: FileArea,
}

impl DirectoryBackend {
    pub fn new(root: impl Into<PathBuf>, file_name: &str) -> Self {
        Self {
            area: FileArea::new(root, file_name),
        }
    }

    pub fn root(&self) -> &Path {
        self.area.root()
    }
}

impl StorageBackend for DirectoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::DirectoryHandle
    }

    fn probe(&self) -> bool {
        self.area.is_usable()
    }

    fn read_all(&self) -> Result<Option<String>> {
        self.area.read()
    }

    fn write_all(&self, text: &str) -> Result<()> {
        self.area.write_atomic(text)
    }

    fn ensure_sub_area(&self, name: &str) -> Result<AreaHandle> {
        self.area.sub_area(name)
    }

    fn location(&self) -> String {
        self.area.data_path().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_probe_requires_existing_directory() {
        let dir = tempdir().unwrap();
        assert!(DirectoryBackend::new(dir.path(), "recipes.csv").probe());
        assert!(!DirectoryBackend::new(dir.path().join("missing"), "recipes.csv").probe());
    }

    #[test]
    fn test_probe_does_not_create_anything() {
        let dir = tempdir().unwrap();
        let backend = DirectoryBackend::new(dir.path(), "recipes.csv");
        backend.probe();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_supports_sub_areas() {
        let dir = tempdir().unwrap();
        let backend = DirectoryBackend::new(dir.path(), "recipes.csv");
        let area = backend.ensure_sub_area("images").unwrap();
        assert_eq!(area.path(), dir.path().join("images"));
    }
}
