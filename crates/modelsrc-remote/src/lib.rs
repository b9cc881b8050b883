//! Registry access for modelsrc.
//!
//! This crate provides the registry endpoint configuration (`RegistryConfig`),
//! a blocking HTTP manifest client with an overall request deadline
//! (`HttpRegistry`), the `ManifestSource` seam that lets callers swap in fake
//! transports, and `resolve_sources`, which runs fetch and planning end to end.

pub mod config;
pub mod http;
pub mod resolve;

pub use config::{RegistryConfig, DEFAULT_REGISTRY_URL, DEFAULT_TIMEOUT_SECS};
pub use http::HttpRegistry;
pub use resolve::resolve_sources;

use modelsrc_schema::{Manifest, ModelReference};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("transport failure for {url}: {reason}")]
    Transport {
        url: String,
        reason: String,
        timed_out: bool,
    },
    #[error("failed to fetch manifest from {url}: {status}")]
    UnexpectedStatus { url: String, status: String },
    #[error("failed to decode manifest from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("registry config error: {0}")]
    Config(String),
    #[error("registry config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RemoteError {
    /// True when the request deadline expired before a response arrived.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }
}

/// Anything that can hand back the manifest for a model reference.
pub trait ManifestSource {
    /// Base URL that manifest and blob URLs are resolved against.
    fn base_url(&self) -> &str;

    /// Retrieve and decode the manifest for `reference`. One attempt, no retries.
    fn fetch_manifest(&self, reference: &ModelReference) -> Result<Manifest, RemoteError>;
}
