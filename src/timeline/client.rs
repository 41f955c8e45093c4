use std::future::Future;

use tracing::debug;
use url::Url;

use crate::config::Settings;
use crate::error::FetchError;

use super::api_types::ApiStatus;
use super::format::{format_timeline, FormatOptions};
use super::types::{PageQuery, TimelinePage};

/// Maximum page size accepted by Mastodon and Pixelfed
pub const PAGE_LIMIT: u32 = 40;

/// Anything that can hand out formatted timeline pages.
pub trait TimelineSource {
  fn fetch_page(&self, query: &PageQuery) -> impl Future<Output = Result<TimelinePage, FetchError>>;
}

impl<T: TimelineSource> TimelineSource for &T {
  fn fetch_page(&self, query: &PageQuery) -> impl Future<Output = Result<TimelinePage, FetchError>> {
    (**self).fetch_page(query)
  }
}

/// HTTP client for one account's public timeline
#[derive(Clone)]
pub struct TimelineClient {
  http: reqwest::Client,
  settings: Settings,
}

impl TimelineClient {
  pub fn new(settings: &Settings) -> Result<Self, FetchError> {
    let mut builder = reqwest::Client::builder().timeout(settings.timeout);
    if let Some(agent) = &settings.user_agent {
      builder = builder.user_agent(agent.clone());
    }

    Ok(Self {
      http: builder.build()?,
      settings: settings.clone(),
    })
  }

  /// Full request URL for a page, including query parameters.
  pub fn page_url(&self, query: &PageQuery) -> Result<Url, FetchError> {
    let mut url = self.settings.timeline_url()?;
    {
      let mut pairs = url.query_pairs_mut();
      pairs.append_pair("limit", &PAGE_LIMIT.to_string());
      pairs.append_pair("exclude_replies", &self.settings.exclude_replies);
      pairs.append_pair("exclude_reblogs", &self.settings.exclude_reblogs);
      if let Some(since) = &query.since_id {
        pairs.append_pair("since_id", since);
      }
      if let Some(max) = &query.max_id {
        pairs.append_pair("max_id", max);
      }
    }
    Ok(url)
  }
}

impl TimelineSource for TimelineClient {
  async fn fetch_page(&self, query: &PageQuery) -> Result<TimelinePage, FetchError> {
    let url = self.page_url(query)?;
    debug!(%url, "Fetching timeline page");

    let response = self.http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status(status));
    }

    let body = response.text().await?;
    let statuses: Vec<ApiStatus> = serde_json::from_str(&body)?;

    let received = statuses.len();
    let last_id = statuses.last().map(|s| s.id.clone());
    let posts = format_timeline(statuses, &FormatOptions::from_settings(&self.settings));
    debug!(received, kept = posts.len(), "Formatted timeline page");

    Ok(TimelinePage {
      posts,
      last_id,
      received,
    })
  }
}
