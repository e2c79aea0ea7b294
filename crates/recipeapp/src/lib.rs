//! # Recipes Architecture
//!
//! Recipes is a **local-first recipe store**. The collection is one plain CSV
//! text that lives on whatever storage the device offers, and it reads the same
//! no matter which substrate produced it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (crates/recipes)                                       │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs) + Command Layer (commands/*.rs)         │
//! │  - Drafts in, structured CmdResult out                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record Store (store/record_store.rs)                       │
//! │  - In-memory set, write-through, seed fallback              │
//! │  - Query engine (query.rs) over snapshots                   │
//! └─────────────────────────────────────────────────────────────┘
//!            │                                   │
//!            ▼                                   ▼
//! ┌──────────────────────────┐     ┌────────────────────────────┐
//! │  Codec + Normalizer      │     │  Selector + Drivers        │
//! │  codec.rs, normalize.rs  │     │  store/selector.rs, ...    │
//! └──────────────────────────┘     └────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! The selector picks one backend at startup. The record store reads its text
//! (or the network seed when the backend holds no records), the codec decodes it
//! and the normalizer turns each row into a valid [`model::Recipe`]. Mutations
//! re-encode the complete set, write it through the active backend, and replace
//! the in-memory set with the decoded result of what was written.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Backend contract, drivers, selector and the record store
//! - [`codec`]: CSV interchange encode/decode
//! - [`normalize`]: Raw rows to valid recipes
//! - [`query`]: Filtering and stable sorting
//! - [`model`]: Core data types (`Recipe`, `RawRow`, `Field`)
//! - [`assets`]: Image references and the asset cache
//! - [`config`]: Configuration management
//! - [`init`]: Startup wiring
//! - [`error`]: Error types

pub mod api;
pub mod assets;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod normalize;
pub mod query;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
