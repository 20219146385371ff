//! # Error Types
//!
//! Errors of the application shell.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in partslist                              │
//! │                                                                         │
//! │  FetchError (io / http / status) ──┐                                   │
//! │                                     ├──► PipelineError::DataUnavailable │
//! │  CoreError::InvalidData (json) ────┘         │                          │
//! │                                              ▼                          │
//! │                                   tracing::error! (exactly once)        │
//! │                                   region left untouched                 │
//! │                                                                         │
//! │  SinkError   ──► PipelineError::Sink    (host page has no region)       │
//! │  ConfigError ──► PipelineError::Config  (bad config file / env)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use partslist_core::{CoreError, ValidationError};
use thiserror::Error;

// =============================================================================
// Pipeline Error
// =============================================================================

/// Everything that can stop a render.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The data file could not be fetched or is not a list of line items.
    ///
    /// ## When This Occurs
    /// - The file does not exist / the server is unreachable
    /// - The server answered with a non-success status
    /// - The document is not a JSON array of line items
    #[error("Data unavailable from {location}: {reason}")]
    DataUnavailable { location: String, reason: String },

    /// The table could not be placed into the display region.
    #[error("Presentation failed: {0}")]
    Sink(#[from] SinkError),

    /// The table could not be built or rendered.
    #[error("Render failed: {0}")]
    Render(#[from] CoreError),

    /// Configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading the host page or writing the output failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Checks if this is the data-unavailable condition.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, PipelineError::DataUnavailable { .. })
    }
}

// =============================================================================
// Fetch Error
// =============================================================================

/// Transport failures of a [`crate::loader::Fetch`] implementation.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Local file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP response with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The location is neither a readable path nor a supported URL.
    #[error("Unsupported location: {0}")]
    UnsupportedLocation(String),

    /// Source reported itself unavailable.
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Sink Error
// =============================================================================

/// Failures of a [`crate::sink::DisplayRegion`].
#[derive(Debug, Error)]
pub enum SinkError {
    /// No element with the configured id exists in the host page.
    #[error("Display region #{0} not found in host page")]
    RegionNotFound(String),

    /// The element exists but its markup cannot be replaced.
    #[error("Display region #{id} is malformed: {reason}")]
    MalformedRegion { id: String, reason: String },
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::config::AppConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Tax rate is not a usable percentage.
    #[error("Invalid tax rate: {0}")]
    TaxRate(#[from] ValidationError),

    /// A value is missing or out of place.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Convenience type alias for Results with PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;

// =============================================================================
// Unit Tests
// =============================================================================
