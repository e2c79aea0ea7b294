//! # Assets
//!
//! Recipe images are referenced from `image_url`, which is one of:
//!
//! - empty: no image
//! - an external URL (`http://`, `https://`, `data:`): displayed as is
//! - a path relative to the backend root, e.g. `images/img_1712345678901.png`
//!
//! Relative references only mean something while a hierarchical backend is
//! active. [`AssetCache`] resolves them through an [`AssetResolver`] and keeps
//! each loaded asset until it is invalidated or the cache is cleared. A missing
//! asset is logged and skipped; it never fails the caller.

use crate::error::{RecipeError, Result};
use crate::store::AreaHandle;
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const EXTERNAL_PREFIXES: [&str; 3] = ["http://", "https://", "data:"];
const DEFAULT_IMAGE_EXT: &str = "png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    None,
    External(&'a str),
    Relative(&'a str),
}

impl<'a> ImageRef<'a> {
    pub fn classify(reference: &'a str) -> Self {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            ImageRef::None
        } else if EXTERNAL_PREFIXES
            .iter()
            .any(|p| trimmed.to_ascii_lowercase().starts_with(p))
        {
            ImageRef::External(trimmed)
        } else {
            ImageRef::Relative(trimmed)
        }
    }
}

/// A loaded asset, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHandle {
    pub reference: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl AssetHandle {
    pub fn media_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("svg") => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }
}

pub trait AssetResolver {
    fn resolve(&self, reference: &str) -> Result<AssetHandle>;
}

/// Resolves references against the root of a directory-shaped backend.
pub struct DirectoryAssetResolver {
    root: PathBuf,
}

impl DirectoryAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn for_area(area: &AreaHandle) -> Self {
        Self::new(area.backend_root())
    }
}

impl AssetResolver for DirectoryAssetResolver {
    fn resolve(&self, reference: &str) -> Result<AssetHandle> {
        let relative = Path::new(reference);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(RecipeError::AssetNotFound(reference.to_string()));
        }

        let path = self.root.join(relative);
        match fs::read(&path) {
            Ok(bytes) => Ok(AssetHandle {
                reference: reference.to_string(),
                path,
                bytes,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RecipeError::AssetNotFound(reference.to_string()))
            }
            Err(e) => Err(RecipeError::Io(e)),
        }
    }
}

/// Loaded assets keyed by reference. Handles are owned by their entry and
/// released on [`AssetCache::invalidate`] or [`AssetCache::clear`].
pub struct AssetCache<R: AssetResolver> {
    resolver: R,
    entries: HashMap<String, AssetHandle>,
}

impl<R: AssetResolver> AssetCache<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            entries: HashMap::new(),
        }
    }

    /// Handle for a relative reference, loading it on first use. Empty and
    /// external references, and assets that cannot be found, give `None`.
    pub fn get(&mut self, reference: &str) -> Option<&AssetHandle> {
        let key = match ImageRef::classify(reference) {
            ImageRef::Relative(path) => path.to_string(),
            ImageRef::None | ImageRef::External(_) => return None,
        };

        if !self.entries.contains_key(&key) {
            match self.resolver.resolve(&key) {
                Ok(handle) => {
                    debug!(reference = %key, "Asset loaded");
                    self.entries.insert(key.clone(), handle);
                }
                Err(e) => {
                    warn!(reference = %key, error = %e, "Asset unavailable");
                    return None;
                }
            }
        }
        self.entries.get(&key)
    }

    /// Drop one entry. Returns true if it was cached.
    pub fn invalidate(&mut self, reference: &str) -> bool {
        self.entries.remove(reference.trim()).is_some()
    }

    /// Drop every entry, returning how many were released.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Copy `source` into `area` as `img_<unix millis>.<ext>` and return the
/// backend-relative reference to store in `image_url`.
pub fn save_image(area: &AreaHandle, source: &Path) -> Result<String> {
    if !source.is_file() {
        return Err(RecipeError::AssetNotFound(source.display().to_string()));
    }
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_IMAGE_EXT.to_string());

    let dir = area.path();
    fs::create_dir_all(&dir).map_err(RecipeError::Io)?;

    let millis = Utc::now().timestamp_millis();
    let mut file_name = format!("img_{}.{}", millis, ext);
    let mut attempt = 1;
    while dir.join(&file_name).exists() {
        file_name = format!("img_{}_{}.{}", millis, attempt, ext);
        attempt += 1;
    }

    fs::copy(source, dir.join(&file_name)).map_err(RecipeError::Io)?;
    Ok(area.reference_for(&file_name))
}
