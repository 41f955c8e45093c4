use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post in the shape the site consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
  pub date: DateTime<Utc>,
  pub id: String,
  pub content: String,
  /// Permalink of the post on the remote server
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  pub source_url: String,
  pub site: String,
  pub site_url: String,
  pub service: String,
  #[serde(default)]
  pub media: Vec<Media>,
  #[serde(default)]
  pub emojis: Vec<Emoji>,
  pub via: Option<String>,
  pub via_url: Option<String>,
}

/// Media attachment descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
  pub image: Option<String>,
  pub alt: Option<String>,
  pub width: Option<u32>,
  pub height: Option<u32>,
  pub aspect: Option<f64>,
}

/// Custom emoji substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
  pub shortcode: String,
  pub url: String,
}

/// Cursor parameters for one timeline request.
///
/// Both may be set at once and are then both sent; the sync loop only ever
/// sets one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
  /// Only posts newer than this id
  pub since_id: Option<String>,
  /// Only posts older than this id
  pub max_id: Option<String>,
}

impl PageQuery {
  /// The most recent page.
  pub fn latest() -> Self {
    Self::default()
  }

  pub fn since(id: impl Into<String>) -> Self {
    Self {
      since_id: Some(id.into()),
      max_id: None,
    }
  }

  pub fn before(id: impl Into<String>) -> Self {
    Self {
      since_id: None,
      max_id: Some(id.into()),
    }
  }
}

/// One formatted page of the remote timeline
#[derive(Debug, Clone, Default)]
pub struct TimelinePage {
  /// Posts that survived formatting, in remote order
  pub posts: Vec<Post>,
  /// Id of the last status the remote returned, before filtering
  pub last_id: Option<String>,
  /// Number of statuses the remote returned, before filtering
  pub received: usize,
}

impl TimelinePage {
  /// The remote had nothing more to give.
  pub fn is_exhausted(&self) -> bool {
    self.received == 0
  }
}
