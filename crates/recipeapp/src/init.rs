//! # Startup
//!
//! [`initialize`] turns configuration and a couple of command-line choices into a
//! ready [`RecipesApi`]:
//!
//! 1. Resolve the private data directory.
//! 2. Load `recipes.toml` from the global config dir and the data dir (merged).
//! 3. Build a [`StoreContext`] with every driver the configuration allows.
//! 4. Open the store: probe once, select, load.
//!
//! ## Data Directory
//!
//! In priority order:
//! - the explicit `data_override` argument
//! - the `RECIPES_DATA` environment variable (primarily for testing)
//! - the OS data directory from the `directories` crate
//!
//! ## Directory Grant
//!
//! A directory passed at startup counts as an explicit grant: it is probed
//! before anything else and wins selection. A directory that does not exist or
//! is not writable is an error, never a silent fallback.

use crate::api::RecipesApi;
use crate::config::RecipesConfig;
use crate::error::{RecipeError, Result};
use crate::store::directory::DirectoryBackend;
use crate::store::embedded::EmbeddedBackend;
use crate::store::network::NetworkSeed;
use crate::store::private_area::PrivateAreaBackend;
use crate::store::{RecipeStore, StorageBackend, StoreContext};
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DATA_ENV: &str = "RECIPES_DATA";
pub const EMBEDDED_DB_FILE: &str = "recipes.db";

pub struct RecipesContext {
    pub api: RecipesApi,
    pub config: RecipesConfig,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Private data directory, overriding `RECIPES_DATA` and the OS default.
    pub data_override: Option<PathBuf>,
    /// Directory granted at startup.
    pub directory: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "recipes", "recipes")
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| RecipeError::Store("Could not determine a data directory".to_string()))
}

/// Layered config: global config dir first, the data dir overrides it.
pub fn load_config(data_dir: &Path) -> RecipesConfig {
    let mut search_paths = Vec::new();
    if let Some(dirs) = project_dirs() {
        search_paths.push(SearchPath::Path(dirs.config_dir().to_path_buf()));
    }
    search_paths.push(SearchPath::Path(data_dir.to_path_buf()));

    Clapfig::builder()
        .app_name("recipes")
        .file_name("recipes.toml")
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default()
}

/// Wire up the drivers `config` allows. Nothing is probed except a
/// startup-granted directory.
pub fn build_context(
    config: &RecipesConfig,
    data_dir: &Path,
    directory: Option<&Path>,
) -> Result<StoreContext> {
    let mut context = StoreContext::new().with_directory_access(config.directory_access);

    if let Some(dir) = directory {
        if !config.directory_access {
            return Err(RecipeError::Store(
                "Directory access is disabled in configuration".to_string(),
            ));
        }
        let backend = DirectoryBackend::new(dir, &config.data_file);
        if !backend.probe() {
            return Err(RecipeError::DirectoryUnavailable(dir.display().to_string()));
        }
        context = context.with_granted_directory(backend);
    }

    if config.private_area {
        context = context.with_private_area(PrivateAreaBackend::new(data_dir, &config.data_file));
    }

    if config.embedded_store {
        let db_path = data_dir.join(EMBEDDED_DB_FILE);
        context = context.with_embedded(EmbeddedBackend::deferred(&db_path));
    }

    if let Some(source) = config.seed_source() {
        debug!(?source, "Seed configured");
        context = context.with_seed(NetworkSeed::new(source));
    }

    Ok(context)
}

/// Initialize the recipes context: config, backends, and the loaded store.
pub fn initialize(options: InitOptions) -> Result<RecipesContext> {
    let data_dir = resolve_data_dir(options.data_override)?;
    let config = load_config(&data_dir);
    debug!(data_dir = %data_dir.display(), ?config, "Configuration loaded");

    let context = build_context(&config, &data_dir, options.directory.as_deref())?;
    let store = RecipeStore::open(context)?;
    let api = RecipesApi::new(store, config.clone());

    Ok(RecipesContext {
        api,
        config,
        data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BackendKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_override_wins() {
        let dir = tempdir().unwrap();
        let resolved = resolve_data_dir(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn test_private_area_is_default_backend() {
        let dir = tempdir().unwrap();
        let ctx = initialize(InitOptions {
            data_override: Some(dir.path().join("data")),
            directory: None,
        })
        .unwrap();
        let status = ctx.api.store().status().unwrap();
        assert_eq!(status.backend, BackendKind::PrivateArea);
        assert!(status.directory_grant_available);
        assert!(!dir.path().join("data").join(EMBEDDED_DB_FILE).exists());
    }

    #[test]
    fn test_embedded_store_when_private_area_disabled() {
        let dir = tempdir().unwrap();
        let config = RecipesConfig {
            private_area: false,
            ..Default::default()
        };
        let context = build_context(&config, dir.path(), None).unwrap();
        let store = RecipeStore::open(context).unwrap();
        assert_eq!(store.status().unwrap().backend, BackendKind::EmbeddedStore);
        assert!(dir.path().join(EMBEDDED_DB_FILE).exists());
    }

    #[test]
    fn test_nothing_enabled_is_read_only_seed() {
        let dir = tempdir().unwrap();
        let seed = dir.path().join("seed.csv");
        fs::write(&seed, "id,title\n1,Pasta").unwrap();
        let config = RecipesConfig {
            private_area: false,
            embedded_store: false,
            seed_file: Some(seed),
            ..Default::default()
        };
        let store = RecipeStore::open(build_context(&config, dir.path(), None).unwrap()).unwrap();
        let status = store.status().unwrap();
        assert_eq!(status.backend, BackendKind::NetworkSeedOnly);
        assert!(!status.writable);
        assert_eq!(store.snapshot()[0].title, "Pasta");
    }

    #[test]
    fn test_startup_directory_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let result = build_context(&RecipesConfig::default(), dir.path(), Some(&missing));
        assert!(matches!(result, Err(RecipeError::DirectoryUnavailable(_))));
    }

    #[test]
    fn test_startup_directory_wins() {
        let dir = tempdir().unwrap();
        let granted = dir.path().join("granted");
        fs::create_dir(&granted).unwrap();
        let context =
            build_context(&RecipesConfig::default(), &dir.path().join("data"), Some(&granted))
                .unwrap();
        let store = RecipeStore::open(context).unwrap();
        assert_eq!(store.status().unwrap().backend, BackendKind::DirectoryHandle);
    }
}
