//! Course catalog: fetch the static catalog document and flatten it for search.
//!
//! Loading is all-or-nothing. A fetch or parse failure yields
//! `CatalogUnavailable` and leaves any previously loaded index untouched;
//! callers with nothing loaded yet search an empty index.

pub mod types;

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::error::{DrTerpError, Result};
use crate::http_client::ApiHttpClient;

pub use types::{CatalogDocument, CatalogIndex, CourseRecord};

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    Path(PathBuf),
}

impl CatalogSource {
    /// `http://` and `https://` locations are URLs, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            CatalogSource::Url(location.to_string())
        } else {
            CatalogSource::Path(PathBuf::from(location))
        }
    }
}

/// Parse and flatten a catalog document.
pub fn parse_catalog(json: &str) -> Result<CatalogIndex> {
    let doc: CatalogDocument = serde_json::from_str(json)
        .map_err(|e| DrTerpError::CatalogUnavailable(format!("Invalid catalog document: {}", e)))?;
    Ok(CatalogIndex::from_document(doc))
}

/// Flatten an already-fetched JSON value.
pub fn catalog_from_value(value: serde_json::Value) -> Result<CatalogIndex> {
    let doc: CatalogDocument = serde_json::from_value(value)
        .map_err(|e| DrTerpError::CatalogUnavailable(format!("Invalid catalog document: {}", e)))?;
    Ok(CatalogIndex::from_document(doc))
}

/// Read and flatten a catalog file. Blocking.
pub fn load_from_path(path: &Path) -> Result<CatalogIndex> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        DrTerpError::CatalogUnavailable(format!("Failed to read catalog {:?}: {}", path, e))
    })?;
    parse_catalog(&json)
}

/// Load the catalog from its configured source.
pub async fn load(source: &CatalogSource, http: &ApiHttpClient) -> Result<CatalogIndex> {
    let result = match source {
        CatalogSource::Url(url) => match http.get_json(url).await {
            Ok(value) => catalog_from_value(value),
            Err(e) => Err(DrTerpError::CatalogUnavailable(e.to_string())),
        },
        CatalogSource::Path(path) => {
            let path = path.clone();
            tokio::task::spawn_blocking(move || load_from_path(&path))
                .await
                .map_err(|e| {
                    DrTerpError::CatalogUnavailable(format!("Catalog task panicked: {}", e))
                })?
        }
    };

    match &result {
        Ok(index) => info!("Loaded catalog with {} courses", index.len()),
        Err(e) => warn!("Catalog load failed: {}", e),
    }
    result
}

/// Shared handle to the current catalog. Readers get a cheap `Arc` snapshot;
/// a reload swaps the whole index at once.
#[derive(Debug, Default)]
pub struct CatalogStore {
    current: RwLock<Arc<CatalogIndex>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<CatalogIndex> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Install a freshly loaded index. On error nothing changes and the error
    /// is handed back so the caller can offer a retry.
    pub fn replace_with(&self, loaded: Result<CatalogIndex>) -> Result<Arc<CatalogIndex>> {
        let index = Arc::new(loaded?);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = index.clone();
        Ok(index)
    }

    /// Load from `source` and install the result.
    pub async fn reload(
        &self,
        source: &CatalogSource,
        http: &ApiHttpClient,
    ) -> Result<Arc<CatalogIndex>> {
        self.replace_with(load(source, http).await)
    }
}
