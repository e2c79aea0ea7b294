use recipeapp::error::RecipeError;
use recipeapp::model::Recipe;
use recipeapp::store::backend::StorageBackend;
use recipeapp::store::directory::DirectoryBackend;
use recipeapp::store::embedded::EmbeddedBackend;
use recipeapp::store::private_area::PrivateAreaBackend;
use recipeapp::store::{BackendKind, RecipeStore, StoreContext};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, DirectoryBackend) {
    let dir = TempDir::new().unwrap();
    let backend = DirectoryBackend::new(dir.path(), "recipes.csv");
    (dir, backend)
}

#[test]
fn test_directory_backend_basic_io() {
    let (_dir, backend) = setup();

    // 1. Nothing yet
    assert_eq!(backend.read_all().unwrap(), None);

    // 2. Write
    backend.write_all("id,title\n1,Soup").unwrap();

    // 3. Read
    assert_eq!(
        backend.read_all().unwrap(),
        Some("id,title\n1,Soup".to_string())
    );
}

#[test]
fn test_directory_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();

    backend.write_all("first").unwrap();
    backend.write_all("second").unwrap();

    let on_disk = fs::read_to_string(dir.path().join("recipes.csv")).unwrap();
    assert_eq!(on_disk, "second");

    // Verify NO .tmp files are left behind
    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_failed_write_keeps_previous_file() {
    let dir = TempDir::new().unwrap();
    let store_dir = dir.path().join("store");
    fs::create_dir(&store_dir).unwrap();
    fs::write(store_dir.join("recipes.csv"), "id,title\na,Original").unwrap();

    let store = RecipeStore::open(
        StoreContext::new().with_granted_directory(DirectoryBackend::new(&store_dir, "recipes.csv")),
    )
    .unwrap();

    // A directory where the data file should be makes the rename fail.
    fs::remove_file(store_dir.join("recipes.csv")).unwrap();
    fs::create_dir(store_dir.join("recipes.csv")).unwrap();
    fs::write(store_dir.join("recipes.csv").join("blocker"), "x").unwrap();

    let err = store
        .put(Recipe {
            title: "New".into(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        RecipeError::BackendWriteFailed {
            backend: BackendKind::DirectoryHandle,
            ..
        }
    ));
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.snapshot()[0].title, "Original");

    let leftovers: Vec<_> = fs::read_dir(&store_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_private_area_round_trip_through_store() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("data");

    {
        let store = RecipeStore::open(
            StoreContext::new().with_private_area(PrivateAreaBackend::new(&root, "recipes.csv")),
        )
        .unwrap();
        store
            .put(Recipe {
                title: "Mac, cheese".into(),
                steps: vec!["Boil".into(), "Stir \"well\"".into()],
                calories: Some(0.0),
                ..Default::default()
            })
            .unwrap();
    }

    let reopened = RecipeStore::open(
        StoreContext::new().with_private_area(PrivateAreaBackend::new(&root, "recipes.csv")),
    )
    .unwrap();
    let snapshot = reopened.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title, "Mac, cheese");
    assert_eq!(snapshot[0].steps, vec!["Boil", "Stir \"well\""]);
    assert_eq!(snapshot[0].calories, Some(0.0));
    assert_eq!(snapshot[0].servings, None);
}

#[test]
fn test_embedded_store_persists_across_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db").join("recipes.db");

    {
        let store = RecipeStore::open(
            StoreContext::new().with_embedded(EmbeddedBackend::open(&path).unwrap()),
        )
        .unwrap();
        assert_eq!(
            store.status().unwrap().backend,
            BackendKind::EmbeddedStore
        );
        store
            .put(Recipe {
                id: "k1".into(),
                title: "Kimchi".into(),
                ..Default::default()
            })
            .unwrap();
    }

    let backend = EmbeddedBackend::open(&path).unwrap();
    let text = backend.read_all().unwrap().unwrap();
    assert!(text.contains("k1,Kimchi"));
}
