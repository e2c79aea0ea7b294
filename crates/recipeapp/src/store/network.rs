use super::backend::StorageBackend;
use super::BackendKind;
use crate::error::{RecipeError, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the read-only seed collection comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    Url(String),
    File(PathBuf),
}

/// Read-only seed collection. Any failure to obtain it is logged and reported
/// as "nothing stored", never as an error.
pub struct NetworkSeed {
    source: SeedSource,
}

impl NetworkSeed {
    pub fn new(source: SeedSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &SeedSource {
        &self.source
    }

    fn fetch_url(url: &str) -> Option<String> {
        let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
        let response = match agent.get(url).call() {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "Seed fetch failed");
                return None;
            }
        };
        match response.into_string() {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url, error = %e, "Seed body could not be read");
                None
            }
        }
    }
}

impl StorageBackend for NetworkSeed {
    fn kind(&self) -> BackendKind {
        BackendKind::NetworkSeedOnly
    }

    fn probe(&self) -> bool {
        match &self.source {
            SeedSource::Url(url) => !url.trim().is_empty(),
            SeedSource::File(path) => path.is_file(),
        }
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn read_all(&self) -> Result<Option<String>> {
        let text = match &self.source {
            SeedSource::Url(url) => Self::fetch_url(url),
            SeedSource::File(path) => match std::fs::read_to_string(path) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Seed file could not be read");
                    None
                }
            },
        };
        if let Some(text) = &text {
            debug!(bytes = text.len(), "Seed collection fetched");
        }
        Ok(text)
    }

    fn write_all(&self, _text: &str) -> Result<()> {
        Err(RecipeError::NoWritableBackend)
    }

    fn location(&self) -> String {
        match &self.source {
            SeedSource::Url(url) => url.clone(),
            SeedSource::File(path) => path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_seed_reads_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seed.csv");
        std::fs::write(&path, "id,title\n1,Pasta").unwrap();
        let seed = NetworkSeed::new(SeedSource::File(path));
        assert!(seed.probe());
        assert_eq!(seed.read_all().unwrap().as_deref(), Some("id,title\n1,Pasta"));
    }

    #[test]
    fn test_missing_seed_is_not_an_error() {
        let dir = tempdir().unwrap();
        let seed = NetworkSeed::new(SeedSource::File(dir.path().join("none.csv")));
        assert!(!seed.probe());
        assert!(seed.read_all().unwrap().is_none());
    }

    #[test]
    fn test_unreachable_url_is_not_an_error() {
        let seed = NetworkSeed::new(SeedSource::Url("http://127.0.0.1:9/recipes.csv".into()));
        assert!(seed.read_all().unwrap().is_none());
    }

    #[test]
    fn test_seed_is_never_writable() {
        let seed = NetworkSeed::new(SeedSource::Url("http://example.invalid/x.csv".into()));
        assert!(!seed.is_writable());
        assert!(matches!(
            seed.write_all("x"),
            Err(RecipeError::NoWritableBackend)
        ));
    }
}
