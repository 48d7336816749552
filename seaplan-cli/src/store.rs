use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use seaplan_core::{DraftExtractor, RouteMap, RouteStore, TemplateLibrary};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteStoreError {
    #[error("failed to access route file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("route file {path} is not a JSON object of distances: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// User route overlay persisted as a single JSON object `{"<from>__<to>": nm}`.
#[derive(Debug, Clone)]
pub struct JsonFileRouteStore {
    path: PathBuf,
}

impl JsonFileRouteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RouteStoreError {
        RouteStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RouteStore for JsonFileRouteStore {
    type Error = RouteStoreError;

    fn load_overlay(&self) -> Result<RouteMap, Self::Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(RouteMap::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        if raw.trim().is_empty() {
            return Ok(RouteMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| RouteStoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn store_overlay(&self, routes: &RouteMap) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let json = serde_json::to_string_pretty(routes).map_err(|source| RouteStoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|err| self.io_error(err))
    }

    fn clear_overlay(&self) -> Result<(), Self::Error> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(self.io_error(err)),
            _ => Ok(()),
        }
    }
}

/// Voyage template list persisted as one JSON array of snapshots.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    path: PathBuf,
}

impl TemplateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> anyhow::Result<TemplateLibrary> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(TemplateLibrary::from_json(&raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(TemplateLibrary::new()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to read templates {}", self.path.display())),
        }
    }

    pub fn store(&self, library: &TemplateLibrary) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, library.to_json()?)
            .with_context(|| format!("failed to write templates {}", self.path.display()))
    }
}

/// Extraction output captured earlier and saved to a file.
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    path: Option<PathBuf>,
}

impl ExtractedFile {
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl DraftExtractor for ExtractedFile {
    type Error = std::io::Error;

    fn extract(&self, _request_text: &str) -> Result<String, Self::Error> {
        let Some(path) = &self.path else {
            return Err(std::io::Error::new(
                ErrorKind::NotFound,
                "no extraction output given (use --extracted <file>)",
            ));
        };
        fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "seaplan-store-{label}-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_file_reads_as_empty_overlay() {
        let store = JsonFileRouteStore::new(temp_path("missing"));
        assert!(store.load_overlay().unwrap().is_empty());
        store.clear_overlay().unwrap();
    }

    #[test]
    fn overlay_persists_and_clears() {
        let path = temp_path("persist");
        let store = JsonFileRouteStore::new(&path);
        let mut routes = RouteMap::new();
        routes.insert("kandla__fujairah".to_string(), 830.0);
        store.store_overlay(&routes).unwrap();

        let reopened = JsonFileRouteStore::new(&path);
        assert_eq!(reopened.load_overlay().unwrap(), routes);

        reopened.clear_overlay().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        let store = JsonFileRouteStore::new(&path);
        assert!(matches!(
            store.load_overlay(),
            Err(RouteStoreError::Parse { .. })
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn templates_persist_between_opens() {
        let path = temp_path("templates");
        let file = TemplateFile::new(&path);
        let mut library = file.load().unwrap();
        assert!(library.is_empty());

        library.save(seaplan_core::VoyageSnapshot::new(
            "Gulf run",
            seaplan_core::Voyage::default(),
        ));
        file.store(&library).unwrap();
        assert_eq!(TemplateFile::new(&path).load().unwrap(), library);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn extractor_without_file_fails() {
        let err = ExtractedFile::new(None).extract("text").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
