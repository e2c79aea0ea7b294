use super::backend::StorageBackend;
use super::selector::{BackendSelector, Capabilities, SelectorState};
use super::BackendKind;
use crate::error::{RecipeError, Result};
use tracing::{debug, info};

/// Everything a store needs to reach its substrates, passed in explicitly.
/// Drivers that are disabled or unavailable on this platform are simply absent.
pub struct StoreContext {
    directory_access: bool,
    directory: Option<Box<dyn StorageBackend>>,
    private_area: Option<Box<dyn StorageBackend>>,
    embedded: Option<Box<dyn StorageBackend>>,
    seed: Option<Box<dyn StorageBackend>>,
    selector: BackendSelector,
}

impl Default for StoreContext {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreContext {
    pub fn new() -> Self {
        Self {
            directory_access: false,
            directory: None,
            private_area: None,
            embedded: None,
            seed: None,
            selector: BackendSelector::new(),
        }
    }

    pub fn with_directory_access(mut self, enabled: bool) -> Self {
        self.directory_access = enabled;
        self
    }

    /// A directory granted before probing, e.g. from a command-line flag.
    pub fn with_granted_directory(mut self, backend: impl StorageBackend + 'static) -> Self {
        self.directory_access = true;
        self.directory = Some(Box::new(backend));
        self
    }

    pub fn with_private_area(mut self, backend: impl StorageBackend + 'static) -> Self {
        self.private_area = Some(Box::new(backend));
        self
    }

    pub fn with_embedded(mut self, backend: impl StorageBackend + 'static) -> Self {
        self.embedded = Some(Box::new(backend));
        self
    }

    pub fn with_seed(mut self, backend: impl StorageBackend + 'static) -> Self {
        self.seed = Some(Box::new(backend));
        self
    }

    /// Probe the configured drivers once and run the selector. Writable
    /// drivers are probed in priority order and stop at the first usable one;
    /// the seed is always probed.
    pub fn probe(&mut self) -> Result<SelectorState> {
        let probe = |slot: &Option<Box<dyn StorageBackend>>| {
            slot.as_ref().map(|backend| backend.probe()).unwrap_or(false)
        };
        let directory_granted = probe(&self.directory);
        let private_area = !directory_granted && probe(&self.private_area);
        let embedded_store = !directory_granted && !private_area && probe(&self.embedded);
        let caps = Capabilities {
            directory_access: self.directory_access,
            directory_granted,
            private_area,
            embedded_store,
            network_seed: probe(&self.seed),
        };
        debug!(?caps, "Probed storage capabilities");
        let state = self.selector.probe(caps)?;
        info!(backend = %self.selector.active_kind(), "Selected storage backend");
        Ok(state)
    }

    /// Switch to a user-granted directory. The directory must probe usable.
    pub fn grant_directory(&mut self, backend: Box<dyn StorageBackend>) -> Result<()> {
        if !self.directory_access {
            return Err(RecipeError::Store(
                "Directory access is disabled in configuration".to_string(),
            ));
        }
        if !backend.probe() {
            return Err(RecipeError::DirectoryUnavailable(backend.location()));
        }
        info!(location = %backend.location(), "Directory granted");
        self.directory = Some(backend);
        self.selector.grant_directory();
        Ok(())
    }

    /// The backend that is currently the record of truth, if any.
    pub fn active(&self) -> Option<&dyn StorageBackend> {
        let slot = match self.selector.state() {
            SelectorState::DirectoryHandleActive => &self.directory,
            SelectorState::PrivateAreaActive => &self.private_area,
            SelectorState::EmbeddedActive => &self.embedded,
            SelectorState::ReadOnlyOrNone => &self.seed,
            SelectorState::Unprobed => return None,
        };
        slot.as_deref()
    }

    pub fn seed(&self) -> Option<&dyn StorageBackend> {
        self.seed.as_deref()
    }

    pub fn state(&self) -> SelectorState {
        self.selector.state()
    }

    pub fn active_kind(&self) -> BackendKind {
        self.selector.active_kind()
    }

    pub fn is_writable(&self) -> bool {
        self.active().map(|b| b.is_writable()).unwrap_or(false)
    }

    pub fn directory_grant_available(&self) -> bool {
        self.directory_access && self.selector.directory_grant_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn test_unprobed_has_no_active_backend() {
        let ctx = StoreContext::new().with_private_area(MemBackend::new());
        assert!(ctx.active().is_none());
        assert!(!ctx.is_writable());
    }

    #[test]
    fn test_failed_probe_falls_through() {
        let private = MemBackend::with_kind(BackendKind::PrivateArea);
        private.set_probe_ok(false);
        let mut ctx = StoreContext::new()
            .with_private_area(private)
            .with_embedded(MemBackend::with_kind(BackendKind::EmbeddedStore));
        assert_eq!(ctx.probe().unwrap(), SelectorState::EmbeddedActive);
        assert_eq!(ctx.active().unwrap().kind(), BackendKind::EmbeddedStore);
    }

    #[test]
    fn test_grant_requires_usable_directory() {
        let mut ctx = StoreContext::new()
            .with_directory_access(true)
            .with_private_area(MemBackend::new());
        ctx.probe().unwrap();

        let broken = MemBackend::with_kind(BackendKind::DirectoryHandle);
        broken.set_probe_ok(false);
        assert!(matches!(
            ctx.grant_directory(Box::new(broken)),
            Err(RecipeError::DirectoryUnavailable(_))
        ));
        assert_eq!(ctx.state(), SelectorState::PrivateAreaActive);

        ctx.grant_directory(Box::new(MemBackend::with_kind(BackendKind::DirectoryHandle)))
            .unwrap();
        assert_eq!(ctx.active_kind(), BackendKind::DirectoryHandle);
    }

    #[test]
    fn test_grant_refused_when_access_disabled() {
        let mut ctx = StoreContext::new().with_private_area(MemBackend::new());
        ctx.probe().unwrap();
        let dir = MemBackend::with_kind(BackendKind::DirectoryHandle);
        assert!(ctx.grant_directory(Box::new(dir)).is_err());
    }

    #[test]
    fn test_lower_priority_drivers_stay_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("recipes.db");
        let mut ctx = StoreContext::new()
            .with_private_area(MemBackend::with_kind(BackendKind::PrivateArea))
            .with_embedded(crate::store::embedded::EmbeddedBackend::deferred(&db));
        assert_eq!(ctx.probe().unwrap(), SelectorState::PrivateAreaActive);
        assert!(!db.exists());
    }
}
