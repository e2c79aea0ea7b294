//! # Storage Layer
//!
//! Recipes live in one interchange text (see [`crate::codec`]) and that text can
//! be kept by several, mutually incompatible, substrates. This module puts all of
//! them behind one contract, [`backend::StorageBackend`], and decides which one is
//! the record of truth.
//!
//! ## Drivers
//!
//! | Driver | Kind | Writable | Sub-areas |
//! |--------|------|----------|-----------|
//! | [`directory::DirectoryBackend`] | `DirectoryHandle` | yes | yes |
//! | [`private_area::PrivateAreaBackend`] | `PrivateArea` | yes | yes |
//! | [`embedded::EmbeddedBackend`] | `EmbeddedStore` | yes | no |
//! | [`network::NetworkSeed`] | `NetworkSeedOnly` | no | no |
//! | [`mem_backend::MemBackend`] | any (tests) | yes | no |
//!
//! ## Selection
//!
//! [`selector`] is a pure state machine over capability booleans. Priority is
//! fixed: a granted directory, then the private area, then the embedded store,
//! then read-only (network seed or nothing). A directory is never picked up
//! without an explicit grant.
//!
//! ## Write-Through
//!
//! [`record_store::RecipeStore`] serializes the full record set and hands it to
//! the active driver's `write_all` in one call. File drivers write a temp file in
//! the same directory and rename it over the target; the embedded store replaces
//! its row inside a transaction. Either the old text or the new text survives an
//! interruption, never a truncated mix.
//!
//! ## Storage Layout
//!
//! ```text
//! <granted dir>/           <private data dir>/
//! ├── recipes.csv          ├── recipes.csv
//! └── images/              ├── images/
//!     └── img_<ms>.png     └── recipes.db   (embedded store)
//! ```

use serde::Serialize;
use std::fmt;

pub mod backend;
pub mod context;
pub mod directory;
pub mod embedded;
pub mod fs_backend;
pub mod mem_backend;
pub mod network;
pub mod private_area;
pub mod record_store;
pub mod selector;

pub use backend::{AreaHandle, StorageBackend};
pub use context::StoreContext;
pub use record_store::{ImportReport, RecipeStore, StoreStatus};
pub use selector::{BackendSelector, Capabilities, SelectorState};

/// The fixed set of storage substrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    DirectoryHandle,
    PrivateArea,
    EmbeddedStore,
    NetworkSeedOnly,
    None,
}

impl BackendKind {
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            BackendKind::DirectoryHandle | BackendKind::PrivateArea | BackendKind::EmbeddedStore
        )
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::DirectoryHandle => "directory",
            BackendKind::PrivateArea => "private-area",
            BackendKind::EmbeddedStore => "embedded-store",
            BackendKind::NetworkSeedOnly => "network-seed",
            BackendKind::None => "none",
        };
        f.write_str(name)
    }
}
