//! # Data Loader
//!
//! Fetches the line-item document and decodes it.
//!
//! ## Fetch Dispatch
//! ```text
//! DataLoader::load()
//!      │
//!      ▼
//! Fetch::fetch(location)          (injected; tests pass a fake)
//!      │
//!      ├── http:// | https://  ──► HttpFetcher  (reqwest, non-2xx = failure)
//!      ├── file://             ──► FileFetcher  (tokio::fs)
//!      └── anything else       ──► FileFetcher  (relative / absolute path)
//!      │
//!      ▼
//! LineItem::parse_list(body)
//!      │
//!      ▼
//! Vec<LineItem>  or  PipelineError::DataUnavailable { location, reason }
//! ```
//!
//! One attempt per load. No retries and no timeout of our own.

use std::future::Future;
use std::path::Path;

use partslist_core::LineItem;
use tracing::debug;
use url::Url;

use crate::error::{FetchError, PipelineError, PipelineResult};

// =============================================================================
// Fetch Trait
// =============================================================================

/// Retrieves the raw text of a document.
pub trait Fetch {
    /// Fetches the document at `location`.
    fn fetch(&self, location: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

impl<T: Fetch + Sync> Fetch for &T {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<String, FetchError>> + Send {
        (**self).fetch(location)
    }
}

// =============================================================================
// File Fetcher
// =============================================================================

/// Reads documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    /// Reads the file at `path`.
    pub async fn fetch_path(&self, path: &Path) -> Result<String, FetchError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Fetch for FileFetcher {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        self.fetch_path(Path::new(location)).await
    }
}

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// Fetches documents with a GET request.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        let response = self.client.get(location).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: location.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

// =============================================================================
// Source Fetcher
// =============================================================================

/// Picks the HTTP or file fetcher from the shape of the location.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    file: FileFetcher,
    http: HttpFetcher,
}

/// Where a location points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    File(std::path::PathBuf),
    Path,
}

impl SourceKind {
    /// Classifies a location string.
    pub fn classify(location: &str) -> Result<Self, FetchError> {
        match Url::parse(location) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(SourceKind::Http),
                "file" => url
                    .to_file_path()
                    .map(SourceKind::File)
                    .map_err(|_| FetchError::UnsupportedLocation(location.to_string())),
                // Windows drive letters parse as one-letter schemes
                scheme if scheme.len() == 1 => Ok(SourceKind::Path),
                _ => Err(FetchError::UnsupportedLocation(location.to_string())),
            },
            Err(_) => Ok(SourceKind::Path),
        }
    }
}

impl SourceFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetch for SourceFetcher {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        match SourceKind::classify(location)? {
            SourceKind::Http => self.http.fetch(location).await,
            SourceKind::File(path) => self.file.fetch_path(&path).await,
            SourceKind::Path => self.file.fetch(location).await,
        }
    }
}

// =============================================================================
// Data Loader
// =============================================================================

/// Loads the line items from one configured location.
#[derive(Debug, Clone)]
pub struct DataLoader<F> {
    fetcher: F,
    location: String,
}

impl<F: Fetch> DataLoader<F> {
    pub fn new(fetcher: F, location: impl Into<String>) -> Self {
        DataLoader {
            fetcher,
            location: location.into(),
        }
    }

    /// Location this loader reads from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Fetches and decodes the line items.
    ///
    /// ## Errors
    /// Any fetch or decode failure is `PipelineError::DataUnavailable`.
    pub async fn load(&self) -> PipelineResult<Vec<LineItem>> {
        debug!(location = %self.location, "Fetching line items");

        let body = self
            .fetcher
            .fetch(&self.location)
            .await
            .map_err(|e| self.unavailable(e))?;

        let items = LineItem::parse_list(&body).map_err(|e| self.unavailable(e))?;

        debug!(count = items.len(), "Loaded line items");
        Ok(items)
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> PipelineError {
        PipelineError::DataUnavailable {
            location: self.location.clone(),
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
