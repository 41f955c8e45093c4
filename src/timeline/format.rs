//! Conversion of raw remote statuses into site posts.

use crate::config::{AltTextPolicy, Settings};

use super::api_types::{ApiAttachment, ApiStatus};
use super::types::{Emoji, Media, Post};

/// Static inputs of the formatter, borrowed from [`Settings`].
#[derive(Debug, Clone)]
pub struct FormatOptions<'a> {
  pub remove_syndicates: &'a [String],
  pub site: &'a str,
  pub site_url: String,
  pub source_url: String,
  pub service: &'a str,
  pub alt_text: AltTextPolicy,
}

impl<'a> FormatOptions<'a> {
  pub fn from_settings(settings: &'a Settings) -> Self {
    Self {
      remove_syndicates: &settings.remove_syndicates,
      site: &settings.site,
      site_url: settings.site_url(),
      source_url: settings
        .timeline_url()
        .map(String::from)
        .unwrap_or_else(|_| settings.site_url()),
      service: &settings.service,
      alt_text: settings.alt_text,
    }
  }
}

/// Filter and reshape one page of statuses, preserving their order.
pub fn format_timeline(statuses: Vec<ApiStatus>, opts: &FormatOptions<'_>) -> Vec<Post> {
  statuses
    .into_iter()
    .filter(|status| !is_syndicated(&status.content, opts.remove_syndicates))
    .map(|status| into_post(status, opts))
    .filter(|post| has_alt_text(post, opts.alt_text))
    .collect()
}

fn is_syndicated(content: &str, markers: &[String]) -> bool {
  markers
    .iter()
    .any(|marker| !marker.is_empty() && content.contains(marker.as_str()))
}

fn has_alt_text(post: &Post, policy: AltTextPolicy) -> bool {
  match policy {
    AltTextPolicy::First => post.media.first().map_or(true, |m| m.alt.is_some()),
    AltTextPolicy::All => post.media.iter().all(|m| m.alt.is_some()),
  }
}

fn into_post(status: ApiStatus, opts: &FormatOptions<'_>) -> Post {
  let (via, via_url) = match status.application {
    Some(app) => (Some(app.name), app.website),
    None => (None, None),
  };

  Post {
    date: status.created_at,
    id: status.id,
    content: status.content,
    url: status.url.or(status.uri),
    source_url: opts.source_url.clone(),
    site: opts.site.to_string(),
    site_url: opts.site_url.clone(),
    service: opts.service.to_string(),
    media: status
      .media_attachments
      .into_iter()
      .map(into_media)
      .collect(),
    emojis: status
      .emojis
      .into_iter()
      .map(|e| Emoji {
        shortcode: e.shortcode,
        url: e.url,
      })
      .collect(),
    via,
    via_url,
  }
}

fn into_media(attachment: ApiAttachment) -> Media {
  let size = attachment.meta.and_then(|m| m.original);
  let (width, height, aspect) = match size {
    Some(s) => {
      let aspect = s.aspect.or_else(|| match (s.width, s.height) {
        (Some(w), Some(h)) if h > 0 => Some(f64::from(w) / f64::from(h)),
        _ => None,
      });
      (s.width, s.height, aspect)
    }
    None => (None, None, None),
  };

  Media {
    image: attachment.url.or(attachment.preview_url),
    alt: attachment.description,
    width,
    height,
    aspect,
  }
}
