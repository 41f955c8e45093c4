//! Sync orchestration: decides between a full backfill and an incremental
//! fetch, merges the result into the cache and persists it.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::{merge, CacheDocument, CacheStorage};
use crate::error::{FetchError, SyncError};
use crate::timeline::{PageQuery, Post, TimelineSource};

/// Drives one sync of a single service's cache.
pub struct Synchronizer<S, T> {
  storage: S,
  source: T,
  is_production: bool,
}

impl<S: CacheStorage, T: TimelineSource> Synchronizer<S, T> {
  pub fn new(storage: S, source: T, is_production: bool) -> Self {
    Self {
      storage,
      source,
      is_production,
    }
  }

  /// Bring the cache up to date and return it.
  ///
  /// 1. Read the cache (a corrupt cache is fatal)
  /// 2. Outside production, return it as-is
  /// 3. Empty cache: walk the whole timeline backwards
  /// 4. Otherwise: fetch one page of posts newer than the newest cached one
  /// 5. On fetch failure, return the cache unchanged without writing
  /// 6. Merge, stamp `lastFetched`, write, return
  pub async fn get_posts(&self) -> Result<CacheDocument, SyncError> {
    let cached: CacheDocument = self.storage.read()?;

    if !self.is_production {
      info!(posts = cached.posts.len(), "Not a production build, serving cache");
      return Ok(cached);
    }

    let fetched = match cached.latest() {
      None => {
        info!("Cache is empty, fetching full archive");
        self.fetch_archive().await
      }
      Some(latest) => {
        info!(since_id = %latest.id, "Fetching posts newer than cache");
        self.fetch_since(&latest.id).await
      }
    };

    let fetched = match fetched {
      Ok(posts) => posts,
      Err(e) => {
        warn!(error = %e, "Timeline fetch failed, keeping previous cache");
        return Ok(cached);
      }
    };

    let new_count = fetched.len();
    let document = CacheDocument {
      last_fetched: Some(Utc::now()),
      posts: merge(fetched, cached.posts),
    };
    self.storage.write(&document)?;

    info!(
      fetched = new_count,
      total = document.posts.len(),
      "Timeline cache updated"
    );
    Ok(document)
  }

  /// Page backwards from the most recent post until the remote runs dry.
  async fn fetch_archive(&self) -> Result<Vec<Post>, FetchError> {
    let mut posts: Vec<Post> = Vec::new();
    let mut query = PageQuery::latest();

    loop {
      let page = self.source.fetch_page(&query).await?;
      if page.is_exhausted() {
        break;
      }
      debug!(
        received = page.received,
        kept = page.posts.len(),
        "Archive page"
      );

      posts = merge(page.posts, posts);

      match page.last_id {
        // A server that ignores max_id would hand back the same page forever
        Some(id) if query.max_id.as_deref() != Some(id.as_str()) => {
          query = PageQuery::before(id);
        }
        _ => break,
      }
    }

    Ok(posts)
  }

  async fn fetch_since(&self, latest_id: &str) -> Result<Vec<Post>, FetchError> {
    let page = self.source.fetch_page(&PageQuery::since(latest_id)).await?;
    Ok(page.posts)
  }
}
