use crate::assets::save_image;
use crate::commands::{label, CmdMessage, CmdResult};
use crate::error::{RecipeError, Result};
use crate::store::RecipeStore;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Copy `image` into the active backend's asset area and point the recipe at
/// it. Only hierarchical backends have an asset area.
pub fn run(store: &RecipeStore, id: &str, image: &Path, images_dir: &str) -> Result<CmdResult> {
    let mut recipe = store
        .get(id)
        .ok_or_else(|| RecipeError::RecordNotFound(id.to_string()))?;

    let area = store.asset_area(images_dir)?;
    let reference = save_image(&area, image)?;
    let file = area.backend_root().join(&reference);

    recipe.image_url = reference;
    let saved = match store.replace_existing(recipe) {
        Ok(saved) => saved,
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&file) {
                warn!(error = %cleanup, file = %file.display(), "Could not remove copied image");
            }
            return Err(e);
        }
    };

    let mut result = CmdResult::default().with_paths(vec![file]);
    result.add_message(CmdMessage::success(format!(
        "Image attached to {}: {}",
        label(&saved),
        saved.image_url
    )));
    Ok(result.with_affected(vec![saved]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::directory::DirectoryBackend;
    use crate::store::mem_backend::MemBackend;
    use crate::store::{BackendKind, StoreContext};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn copies_image_and_links_it() {
        let dir = tempdir().unwrap();
        let store_dir = dir.path().join("store");
        fs::create_dir(&store_dir).unwrap();
        fs::write(store_dir.join("recipes.csv"), "id,title\na,Stew").unwrap();
        let image = dir.path().join("stew.png");
        fs::write(&image, b"png").unwrap();

        let store = RecipeStore::open(
            StoreContext::new()
                .with_granted_directory(DirectoryBackend::new(&store_dir, "recipes.csv")),
        )
        .unwrap();
        let result = run(&store, "a", &image, "images").unwrap();

        let saved = &result.affected[0];
        assert!(saved.image_url.starts_with("images/img_"));
        assert!(store_dir.join(&saved.image_url).is_file());
        let written = fs::read_to_string(store_dir.join("recipes.csv")).unwrap();
        assert!(written.contains(&saved.image_url));
    }

    #[test]
    fn embedded_store_has_no_asset_area() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("x.png");
        fs::write(&image, b"png").unwrap();
        let embedded = MemBackend::with_kind(BackendKind::EmbeddedStore).with_text("id,title\na,Stew");
        let store = RecipeStore::open(StoreContext::new().with_embedded(embedded)).unwrap();

        let err = run(&store, "a", &image, "images").unwrap_err();
        assert!(matches!(
            err,
            RecipeError::AssetAreaUnavailable(BackendKind::EmbeddedStore)
        ));
        assert_eq!(store.get("a").unwrap().image_url, "");
    }

    #[test]
    fn unknown_recipe_fails_before_copying() {
        let dir = tempdir().unwrap();
        let store = RecipeStore::open(
            StoreContext::new().with_granted_directory(DirectoryBackend::new(dir.path(), "recipes.csv")),
        )
        .unwrap();
        let err = run(&store, "nope", &dir.path().join("x.png"), "images").unwrap_err();
        assert!(matches!(err, RecipeError::RecordNotFound(_)));
        assert!(!dir.path().join("images").exists());
    }

    #[test]
    fn failed_write_removes_copied_image() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("stew.png");
        fs::write(&image, b"png").unwrap();
        let store_dir = dir.path().join("store");
        fs::create_dir(&store_dir).unwrap();
        fs::write(store_dir.join("recipes.csv"), "id,title\na,Stew").unwrap();
        let store = RecipeStore::open(
            StoreContext::new()
                .with_granted_directory(DirectoryBackend::new(&store_dir, "recipes.csv")),
        )
        .unwrap();

        // A directory in place of the data file makes the rename fail.
        fs::remove_file(store_dir.join("recipes.csv")).unwrap();
        fs::create_dir(store_dir.join("recipes.csv")).unwrap();
        fs::write(store_dir.join("recipes.csv").join("blocker"), "x").unwrap();

        let err = run(&store, "a", &image, "images").unwrap_err();
        assert!(matches!(err, RecipeError::BackendWriteFailed { .. }));
        let left: Vec<_> = fs::read_dir(store_dir.join("images")).unwrap().collect();
        assert!(left.is_empty());
        assert_eq!(store.get("a").unwrap().image_url, "");
    }
}
