use super::backend::{AreaHandle, StorageBackend};
use super::fs_backend::FileArea;
use super::BackendKind;
use crate::error::Result;
use std::fs;
use std::path::PathBuf;

/// The application's own data directory. Created on first probe; the user
/// never has to pick it.
pub struct PrivateAreaBackend {
    area: FileArea,
}

impl PrivateAreaBackend {
    pub fn new(root: impl Into<PathBuf>, file_name: &str) -> Self {
        Self {
            area: FileArea::new(root, file_name),
        }
    }
}

impl StorageBackend for PrivateAreaBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::PrivateArea
    }

    fn probe(&self) -> bool {
        if fs::create_dir_all(self.area.root()).is_err() {
            return false;
        }
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
    fn test_probe_creates_data_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("data");
        let backend = PrivateAreaBackend::new(&root, "recipes.csv");
        assert!(backend.probe());
        assert!(root.is_dir());
    }

    #[test]
    fn test_probe_fails_when_root_is_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("taken");
        fs::write(&file, "x").unwrap();
        assert!(!PrivateAreaBackend::new(&file, "recipes.csv").probe());
    }
}
