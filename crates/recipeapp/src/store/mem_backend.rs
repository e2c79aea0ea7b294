use super::backend::StorageBackend;
use super::BackendKind;
use crate::error::{RecipeError, Result};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemState {
    text: Option<String>,
    writes: usize,
    simulate_write_error: bool,
    probe_ok: bool,
}

/// In-memory storage backend for testing.
///
/// Clones share state, so a test can keep a handle while the store owns the
/// other one and inspect what was written.
#[derive(Debug, Clone)]
pub struct MemBackend {
    kind: BackendKind,
    state: Arc<Mutex<MemState>>,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self::with_kind(BackendKind::PrivateArea)
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that reports itself as `kind`.
    pub fn with_kind(kind: BackendKind) -> Self {
        Self {
            kind,
            state: Arc::new(Mutex::new(MemState {
                probe_ok: true,
                ..Default::default()
            })),
        }
    }

    /// Pre-load stored text.
    pub fn with_text(self, text: &str) -> Self {
        self.state().text = Some(text.to_string());
        self
    }

    fn state(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state().simulate_write_error = simulate;
    }

    pub fn set_probe_ok(&self, ok: bool) {
        self.state().probe_ok = ok;
    }

    pub fn text(&self) -> Option<String> {
        self.state().text.clone()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.state().writes
    }
}

impl StorageBackend for MemBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn probe(&self) -> bool {
        self.state().probe_ok
    }

    fn read_all(&self) -> Result<Option<String>> {
        Ok(self.state().text.clone())
    }

    fn write_all(&self, text: &str) -> Result<()> {
        if !self.is_writable() {
            return Err(RecipeError::NoWritableBackend);
        }
        let mut state = self.state();
        if state.simulate_write_error {
            return Err(RecipeError::Store("Simulated write error".to_string()));
        }
        state.text = Some(text.to_string());
        state.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        format!("memory ({})", self.kind)
    }
}
