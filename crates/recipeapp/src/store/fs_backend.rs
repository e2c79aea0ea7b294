//! Whole-file storage shared by the directory and private-area drivers.

use super::backend::AreaHandle;
use crate::error::{RecipeError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One interchange file inside a root directory.
#[derive(Debug, Clone)]
pub struct FileArea {
    root: PathBuf,
    file_name: String,
}

impl FileArea {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }

    pub fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(RecipeError::Io)?;
        }
        Ok(())
    }

    /// True when the root is an existing directory we are allowed to write to.
    pub fn is_usable(&self) -> bool {
        match fs::metadata(&self.root) {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(_) => false,
        }
    }

    pub fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.data_path()) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RecipeError::Io(e)),
        }
    }

    /// Write to a temp file next to the target, sync it, then rename over the
    /// target. Rename within one directory is atomic, so readers see either
    /// the previous file or the new one.
    pub fn write_atomic(&self, text: &str) -> Result<()> {
        self.ensure_dir()?;
        let tmp_path = self.root.join(format!(".recipes-{}.tmp", Uuid::new_v4()));

        let written = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(text.as_bytes())?;
            file.sync_all()
        })();
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(RecipeError::Io(e));
        }

        if let Err(e) = fs::rename(&tmp_path, self.data_path()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(RecipeError::Io(e));
        }
        Ok(())
    }

    pub fn sub_area(&self, name: &str) -> Result<AreaHandle> {
        let handle = AreaHandle::new(&self.root, name);
        fs::create_dir_all(handle.path()).map_err(RecipeError::Io)?;
        Ok(handle)
    }
}
