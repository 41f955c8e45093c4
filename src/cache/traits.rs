//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::timeline::Post;

/// Trait for entities that can be cached and merged.
///
/// Implementors provide a unique key and a timestamp used for ordering.
pub trait Cacheable: Clone + Serialize + DeserializeOwned {
  /// Unique identifier for this entity (e.g., status id)
  fn cache_key(&self) -> &str;

  /// Publication time; newer entities sort first.
  fn published_at(&self) -> DateTime<Utc>;
}

impl Cacheable for Post {
  fn cache_key(&self) -> &str {
    &self.id
  }

  fn published_at(&self) -> DateTime<Utc> {
    self.date
  }
}

/// The persisted cache: when it was last refreshed and the posts, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Cacheable")]
pub struct CacheDocument<T = Post> {
  #[serde(rename = "lastFetched")]
  pub last_fetched: Option<DateTime<Utc>>,
  #[serde(default = "Vec::new")]
  pub posts: Vec<T>,
}

impl<T> Default for CacheDocument<T> {
  fn default() -> Self {
    Self {
      last_fetched: None,
      posts: Vec::new(),
    }
  }
}

impl<T: Cacheable> CacheDocument<T> {
  /// Most recent cached entity, if any.
  pub fn latest(&self) -> Option<&T> {
    self.posts.first()
  }
}
