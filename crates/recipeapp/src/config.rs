//! # Configuration
//!
//! Recipes configuration is managed by [`clapfig`], which handles layered loading
//! from TOML files, environment variables, and programmatic overrides.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `RECIPES__DATA_FILE`, `RECIPES__SEED_URL`, etc.
//! 2. **Data-dir Config**: `recipes.toml` next to the data (honours `RECIPES_DATA`).
//! 3. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_file` | `recipes.csv` | File name of the interchange text in file backends |
//! | `images_dir` | `images` | Sub-area that attached images are copied into |
//! | `seed_url` | unset | URL of the read-only seed collection |
//! | `seed_file` | unset | Local seed file, used when `seed_url` is unset |
//! | `private_area` | `true` | Allow the private data directory backend |
//! | `embedded_store` | `true` | Allow the embedded SQLite backend |
//! | `directory_access` | `true` | Allow granting a user directory |
//! | `export_encoding` | `spreadsheet` | Default encoding of `recipes export` |

use crate::codec::Encoding;
use crate::store::network::SeedSource;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for recipes, stored in `recipes.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RecipesConfig {
    /// File name of the interchange text inside directory-shaped backends.
    #[config(default = "recipes.csv")]
    pub data_file: String,

    /// Name of the sub-area holding attached images.
    #[config(default = "images")]
    pub images_dir: String,

    /// Where to fetch the seed collection from when the store is empty.
    pub seed_url: Option<String>,

    /// Local seed collection, used when no `seed_url` is set.
    pub seed_file: Option<PathBuf>,

    #[config(default = true)]
    pub private_area: bool,

    #[config(default = true)]
    pub embedded_store: bool,

    #[config(default = true)]
    pub directory_access: bool,

    #[config(default = "spreadsheet")]
    pub export_encoding: Encoding,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            data_file: "recipes.csv".to_string(),
            images_dir: "images".to_string(),
            seed_url: None,
            seed_file: None,
            private_area: true,
            embedded_store: true,
            directory_access: true,
            export_encoding: Encoding::Spreadsheet,
        }
    }
}

impl RecipesConfig {
    /// The configured seed, preferring the URL. Blank values count as unset.
    pub fn seed_source(&self) -> Option<SeedSource> {
        if let Some(url) = self.seed_url.as_deref().map(str::trim) {
            if !url.is_empty() {
                return Some(SeedSource::Url(url.to_string()));
            }
        }
        self.seed_file.clone().map(SeedSource::File)
    }
}
