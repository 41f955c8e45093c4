//! Serde-deserializable types matching Mastodon/Pixelfed status responses.
//!
//! These types are separate from the site-facing types so that unexpected or
//! missing fields on the remote side never fail a whole page.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiStatus {
  pub id: String,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub content: String,
  pub url: Option<String>,
  pub uri: Option<String>,
  #[serde(default)]
  pub media_attachments: Vec<ApiAttachment>,
  #[serde(default)]
  pub emojis: Vec<ApiEmoji>,
  pub application: Option<ApiApplication>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAttachment {
  pub url: Option<String>,
  pub preview_url: Option<String>,
  /// Alt text; `null` when the author left it blank
  pub description: Option<String>,
  pub meta: Option<ApiAttachmentMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAttachmentMeta {
  pub original: Option<ApiImageSize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImageSize {
  pub width: Option<u32>,
  pub height: Option<u32>,
  pub aspect: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEmoji {
  pub shortcode: String,
  pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiApplication {
  pub name: String,
  pub website: Option<String>,
}
