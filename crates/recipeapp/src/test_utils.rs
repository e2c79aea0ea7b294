//! Store fixtures over [`MemBackend`], shared by unit tests and, with the
//! `test_utils` feature, by downstream crates.

use crate::store::mem_backend::MemBackend;
use crate::store::{BackendKind, RecipeStore, StoreContext};

pub const SAMPLE_CSV: &str = "id,title,category,tags,ingredients,steps,prep_minutes,cook_minutes,servings,calories,image_url\n\
a1,Pasta,Dinner,quick;easy,Pasta 200g|Water,\"Boil water\nAdd pasta\",5,10,2,400,\n\
b2,Toast,Breakfast,quick,Bread|Butter,Toast bread,2,3,1,,\n\
c3,Leek soup,,winter,Leek|Potato|Stock,,15,30,4,250,";

/// A writable store over a private-area `MemBackend` preloaded with `text`.
/// The returned backend shares state with the one inside the store.
pub fn store_with(text: &str) -> (RecipeStore, MemBackend) {
    let backend = MemBackend::with_kind(BackendKind::PrivateArea).with_text(text);
    let store = RecipeStore::open(StoreContext::new().with_private_area(backend.clone()))
        .expect("open store");
    (store, backend)
}

pub fn empty_store() -> (RecipeStore, MemBackend) {
    store_with("")
}

pub fn sample_store() -> (RecipeStore, MemBackend) {
    store_with(SAMPLE_CSV)
}

/// A store with only a seed: readable, never writable.
pub fn read_only_store() -> RecipeStore {
    let seed = MemBackend::with_kind(BackendKind::NetworkSeedOnly).with_text("id,title\n1,Pasta");
    RecipeStore::open(StoreContext::new().with_seed(seed)).expect("open store")
}
