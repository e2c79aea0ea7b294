//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all recipe operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Fills in configuration** (data file name, image area, default export encoding)
//! - **Owns the asset cache** and invalidates it when the backend or an image changes
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! The API explicitly avoids:
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Terminal output**: No stdout, stderr, or colour
//! - **Presentation concerns**: Returns data structures, not strings

use crate::assets::{AssetCache, DirectoryAssetResolver};
use crate::codec::Encoding;
use crate::commands;
use crate::config::RecipesConfig;
use crate::error::Result;
use crate::model::RawRow;
use crate::query::RecipeQuery;
use crate::store::RecipeStore;
use std::path::Path;
use tracing::debug;

/// The main API facade for recipe operations.
/// All UI clients (CLI, tests, ...) should interact through this API.
pub struct RecipesApi {
    store: RecipeStore,
    config: RecipesConfig,
    assets: Option<AssetCache<DirectoryAssetResolver>>,
}

impl RecipesApi {
    pub fn new(store: RecipeStore, config: RecipesConfig) -> Self {
        Self {
            store,
            config,
            assets: None,
        }
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    pub fn config(&self) -> &RecipesConfig {
        &self.config
    }

    pub fn list(&self, query: &RecipeQuery) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, query)
    }

    pub fn view<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<commands::CmdResult> {
        let ids: Vec<String> = ids.iter().map(|i| i.as_ref().to_string()).collect();
        self.ensure_asset_cache();
        commands::view::run(&self.store, &ids, self.assets.as_mut())
    }

    pub fn add(&self, draft: &RawRow) -> Result<commands::CmdResult> {
        commands::add::run(&self.store, draft)
    }

    pub fn update(&self, id: &str, draft: &RawRow) -> Result<commands::CmdResult> {
        commands::update::run(&self.store, id, draft)
    }

    pub fn delete<I: AsRef<str>>(&self, ids: &[I]) -> Result<commands::CmdResult> {
        let ids: Vec<String> = ids.iter().map(|i| i.as_ref().to_string()).collect();
        commands::delete::run(&self.store, &ids)
    }

    pub fn import(&self, path: &Path) -> Result<commands::CmdResult> {
        commands::import::run(&self.store, path)
    }

    /// Export to `path`, using the configured encoding when none is given.
    pub fn export(&self, path: &Path, encoding: Option<Encoding>) -> Result<commands::CmdResult> {
        let encoding = encoding.unwrap_or(self.config.export_encoding);
        commands::export::run(&self.store, path, encoding)
    }

    pub fn write_now(&self) -> Result<commands::CmdResult> {
        commands::write::run(&self.store)
    }

    pub fn grant_directory(&mut self, dir: &Path) -> Result<commands::CmdResult> {
        let result = commands::grant::run(&self.store, dir, &self.config.data_file)?;
        // Relative image references now point into the new directory.
        self.assets = None;
        Ok(result)
    }

    pub fn attach_image(&mut self, id: &str, image: &Path) -> Result<commands::CmdResult> {
        let previous = self.store.get(id).map(|r| r.image_url);
        let result = commands::attach::run(&self.store, id, image, &self.config.images_dir)?;
        if let (Some(cache), Some(previous)) = (self.assets.as_mut(), previous) {
            cache.invalidate(&previous);
        }
        Ok(result)
    }

    pub fn status(&self) -> Result<commands::CmdResult> {
        commands::status::run(&self.store)
    }

    fn ensure_asset_cache(&mut self) {
        if self.assets.is_some() {
            return;
        }
        match self.store.asset_area(&self.config.images_dir) {
            Ok(area) => {
                self.assets = Some(AssetCache::new(DirectoryAssetResolver::for_area(&area)));
            }
            Err(e) => debug!(error = %e, "No asset area; images will not be resolved"),
        }
    }
}
