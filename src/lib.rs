//! Keeps a local JSON cache of a Mastodon or Pixelfed account's public
//! timeline in sync, for static site generators to consume at build time.
//!
//! The whole pipeline is one call: [`get_posts`]. It reads the cache, fetches
//! what is missing from the remote timeline, merges, persists, and returns the
//! posts newest first.

pub mod cache;
pub mod config;
pub mod error;
pub mod sync;
pub mod timeline;

pub use cache::CacheDocument;
pub use config::{Config, Settings};
pub use error::{FetchError, SyncError};
pub use timeline::Post;

use cache::JsonFileStorage;
use sync::Synchronizer;
use timeline::TimelineClient;

/// Sync the cache for the configured service and return it.
///
/// Configuration is validated before any file or network access.
pub async fn get_posts(config: Config) -> Result<CacheDocument, SyncError> {
  let settings = config.validate()?;
  get_posts_with(&settings).await
}

/// Like [`get_posts`], for already validated settings.
pub async fn get_posts_with(settings: &Settings) -> Result<CacheDocument, SyncError> {
  let storage = JsonFileStorage::new(settings.cache_path());
  let client = TimelineClient::new(settings)
    .map_err(|e| SyncError::Config(format!("failed to build HTTP client: {}", e)))?;

  Synchronizer::new(storage, client, settings.is_production)
    .get_posts()
    .await
}
