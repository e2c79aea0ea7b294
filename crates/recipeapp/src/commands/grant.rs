use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::directory::DirectoryBackend;
use crate::store::RecipeStore;
use std::path::Path;

/// Make `dir` the active backend. The in-memory set is replaced by whatever
/// the directory holds; nothing is merged.
pub fn run(store: &RecipeStore, dir: &Path, data_file: &str) -> Result<CmdResult> {
    let snapshot = store.grant_directory(Box::new(DirectoryBackend::new(dir, data_file)))?;

    let mut result = CmdResult::default().with_listed(snapshot.as_ref().clone());
    result.add_message(CmdMessage::success(format!(
        "Using {} ({} recipes)",
        dir.display(),
        snapshot.len()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecipeError;
    use crate::store::mem_backend::MemBackend;
    use crate::store::{BackendKind, StoreContext};
    use tempfile::tempdir;

    fn store() -> RecipeStore {
        let private = MemBackend::with_kind(BackendKind::PrivateArea).with_text("id,title\na,Old");
        RecipeStore::open(
            StoreContext::new()
                .with_directory_access(true)
                .with_private_area(private),
        )
        .unwrap()
    }

    #[test]
    fn load_replaces_with_directory_contents() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("recipes.csv"), "id,title\nd,From dir").unwrap();

        let store = store();
        let result = run(&store, dir.path(), "recipes.csv").unwrap();
        assert_eq!(result.listed.len(), 1);
        assert_eq!(result.listed[0].title, "From dir");
        assert!(store.get("a").is_none());
    }

    #[test]
    fn empty_directory_gives_empty_set() {
        let dir = tempdir().unwrap();
        let store = store();
        let result = run(&store, dir.path(), "recipes.csv").unwrap();
        assert!(result.listed.is_empty());
        assert_eq!(store.status().unwrap().backend, BackendKind::DirectoryHandle);
    }

    #[test]
    fn missing_directory_is_refused() {
        let dir = tempdir().unwrap();
        let store = store();
        let err = run(&store, &dir.path().join("missing"), "recipes.csv").unwrap_err();
        assert!(matches!(err, RecipeError::DirectoryUnavailable(_)));
        assert_eq!(store.snapshot().len(), 1);
    }
}
