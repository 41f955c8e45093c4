//! Error types shared by the sync pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a sync and reach the caller.
#[derive(Error, Debug)]
pub enum SyncError {
  #[error("configuration error: {0}")]
  Config(String),
  #[error("failed to read cache file {}", path.display())]
  CacheRead {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("cache file {} is not valid JSON", path.display())]
  CacheParse {
    path: PathBuf,
    source: serde_json::Error,
  },
  #[error("failed to write cache file {}", path.display())]
  CacheWrite {
    path: PathBuf,
    source: std::io::Error,
  },
}

/// A timeline page could not be retrieved.
///
/// The orchestrator never propagates this; it logs it and serves the
/// previous cache instead.
#[derive(Error, Debug)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("server returned {0}")]
  Status(reqwest::StatusCode),
  #[error("invalid timeline response: {0}")]
  Decode(#[from] serde_json::Error),
  #[error("invalid timeline url: {0}")]
  Url(#[from] url::ParseError),
}
