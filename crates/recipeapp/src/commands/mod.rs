//! # Command Layer
//!
//! This module contains the **core business logic** of recipes. Each command lives in
//! its own submodule and implements plain functions over a
//! [`RecipeStore`](crate::store::RecipeStore).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Turn drafts into records and push them through the store
//! - Return structured `CmdResult` with affected recipes and messages
//! - Are completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! Commands explicitly avoid:
//! - **Terminal output**: No stdout, stderr or colour
//! - **Argument parsing**: That's the CLI layer's job
//! - **Exit codes**: Return `Result`, let the caller decide
//! - **Retries**: A failed write-through is reported once; the caller decides
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`], not strings. This struct carries:
//! - `affected`: Recipes created, changed or removed
//! - `listed`: Recipes to display
//! - `categories`: Category list for filters
//! - `messages`: Structured messages with levels (info, success, warning, error)
//! - `paths`: Files written or resolved (export target, image files)
//! - `status`: Store status (for `status` command)
//!
//! ## Testing Strategy
//!
//! Command tests use a store over `MemBackend` and check `CmdResult` contents
//! and error conditions.
//!
//! ## Command Modules
//!
//! - [`list`]: Filter and sort recipes
//! - [`view`]: Full records by id, with image resolution
//! - [`add`]: Create a recipe from a draft
//! - [`update`]: Full-field replace of an existing recipe
//! - [`delete`]: Remove recipes
//! - [`import`]: Bulk-replace from an interchange file
//! - [`export`]: Write the set to an interchange file
//! - [`write`]: Force a write-through of the current set
//! - [`grant`]: Switch to a user-granted directory
//! - [`attach`]: Copy an image into the asset area and link it
//! - [`status`]: Active backend and record count

use crate::model::Recipe;
use crate::store::{ImportReport, StoreStatus};
use serde::Serialize;
use std::path::PathBuf;

pub mod add;
pub mod attach;
pub mod delete;
pub mod export;
pub mod grant;
pub mod import;
pub mod list;
pub mod status;
pub mod update;
pub mod view;
pub mod write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<Recipe>,
    pub listed: Vec<Recipe>,
    pub categories: Vec<String>,
    pub paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
    pub status: Option<StoreStatus>,
    pub import: Option<ImportReport>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, recipes: Vec<Recipe>) -> Self {
        self.affected = recipes;
        self
    }

    pub fn with_listed(mut self, recipes: Vec<Recipe>) -> Self {
        self.listed = recipes;
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }
}

/// Display name used in messages.
pub(crate) fn label(recipe: &Recipe) -> &str {
    if recipe.title.is_empty() {
        "(untitled)"
    } else {
        &recipe.title
    }
}
