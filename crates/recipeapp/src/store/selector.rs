//! Backend selection as a pure state machine.
//!
//! ```text
//! Unprobed ──probe──▶ DirectoryHandleActive | PrivateAreaActive
//!                   | EmbeddedActive        | ReadOnlyOrNone
//! any      ──grant──▶ DirectoryHandleActive
//! ```
//!
//! Probing happens once. Only an explicit grant moves the machine afterwards.

use super::BackendKind;
use crate::error::{RecipeError, Result};
use serde::Serialize;

/// What the environment can offer. Each flag is the outcome of one probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The platform lets the user grant a directory.
    pub directory_access: bool,
    /// A directory has been granted and probed usable.
    pub directory_granted: bool,
    pub private_area: bool,
    pub embedded_store: bool,
    pub network_seed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorState {
    Unprobed,
    DirectoryHandleActive,
    PrivateAreaActive,
    EmbeddedActive,
    ReadOnlyOrNone,
}

/// Pick the active state from probe outcomes. Directory first, but only when
/// granted; then private area, then embedded store.
pub fn select(caps: &Capabilities) -> SelectorState {
    if caps.directory_granted {
        SelectorState::DirectoryHandleActive
    } else if caps.private_area {
        SelectorState::PrivateAreaActive
    } else if caps.embedded_store {
        SelectorState::EmbeddedActive
    } else {
        SelectorState::ReadOnlyOrNone
    }
}

#[derive(Debug, Clone)]
pub struct BackendSelector {
    state: SelectorState,
    caps: Capabilities,
}

impl Default for BackendSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendSelector {
    pub fn new() -> Self {
        Self {
            state: SelectorState::Unprobed,
            caps: Capabilities::default(),
        }
    }

    pub fn probe(&mut self, caps: Capabilities) -> Result<SelectorState> {
        if self.state != SelectorState::Unprobed {
            return Err(RecipeError::AlreadyProbed);
        }
        self.caps = caps;
        self.state = select(&caps);
        Ok(self.state)
    }

    /// Move to the directory backend. The caller has already checked the
    /// granted directory is usable.
    pub fn grant_directory(&mut self) -> SelectorState {
        self.caps.directory_access = true;
        self.caps.directory_granted = true;
        self.state = SelectorState::DirectoryHandleActive;
        self.state
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn active_kind(&self) -> BackendKind {
        match self.state {
            SelectorState::DirectoryHandleActive => BackendKind::DirectoryHandle,
            SelectorState::PrivateAreaActive => BackendKind::PrivateArea,
            SelectorState::EmbeddedActive => BackendKind::EmbeddedStore,
            SelectorState::ReadOnlyOrNone if self.caps.network_seed => BackendKind::NetworkSeedOnly,
            SelectorState::ReadOnlyOrNone | SelectorState::Unprobed => BackendKind::None,
        }
    }

    /// True while the directory option could still be offered to the user.
    pub fn directory_grant_available(&self) -> bool {
        self.caps.directory_access && self.state != SelectorState::DirectoryHandleActive
    }
}
