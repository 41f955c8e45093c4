use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use url::Url;

use crate::error::SyncError;

const DEFAULT_SITE: &str = "Mastodon";
const DEFAULT_SERVICE: &str = "mastodon";
const DEFAULT_CACHE_DIR: &str = ".cache";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw configuration as written in the YAML file.
///
/// Required options are optional here so that a missing value surfaces as
/// [`SyncError::Config`] from [`Config::validate`] instead of a parse error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
  /// Base URL of the remote server, e.g. `https://mastodon.social`
  pub host: Option<String>,
  /// Remote account id (numeric ids may be written unquoted)
  #[serde(default, deserialize_with = "deserialize_opt_id")]
  pub user_id: Option<String>,
  /// Display name of the remote site
  pub site: Option<String>,
  /// Service name: "pixelfed" selects the Pixelfed API path
  pub service: Option<String>,
  /// Substrings marking a post as already published on the site
  #[serde(default)]
  pub remove_syndicates: Vec<String>,
  /// Only production builds touch the network
  #[serde(default = "default_true")]
  pub is_production: bool,
  #[serde(rename = "exclude_replies", default = "default_exclude")]
  pub exclude_replies: String,
  #[serde(rename = "exclude_reblogs", default = "default_exclude")]
  pub exclude_reblogs: String,
  /// Directory holding `{service}.json` (defaults to `.cache`)
  pub cache_dir: Option<PathBuf>,
  /// Per-request HTTP timeout in seconds
  pub timeout_secs: Option<u64>,
  #[serde(default)]
  pub alt_text: AltTextPolicy,
  pub user_agent: Option<String>,
}

fn default_true() -> bool {
  true
}

fn default_exclude() -> String {
  "true".to_string()
}

/// Accept an account id written either as a YAML string or integer.
fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Id {
    Text(String),
    Number(u64),
  }

  let v: Option<Id> = Option::deserialize(deserializer)?;
  Ok(v.map(|id| match id {
    Id::Text(s) => s,
    Id::Number(n) => n.to_string(),
  }))
}

/// Which media attachments must carry alt text for a post to be kept.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AltTextPolicy {
  /// Only the first attachment is inspected
  #[default]
  First,
  /// Every attachment must have alt text
  All,
}

/// Validated configuration handed to every component.
#[derive(Debug, Clone)]
pub struct Settings {
  pub host: Url,
  pub user_id: String,
  pub site: String,
  pub service: String,
  pub remove_syndicates: Vec<String>,
  pub is_production: bool,
  pub exclude_replies: String,
  pub exclude_reblogs: String,
  pub cache_dir: PathBuf,
  pub timeout: Duration,
  pub alt_text: AltTextPolicy,
  pub user_agent: Option<String>,
}

impl Settings {
  /// Whether the remote speaks the Pixelfed flavour of the API.
  pub fn is_pixelfed(&self) -> bool {
    self.service == "pixelfed"
  }

  /// Path of the account timeline endpoint, relative to `host`.
  pub fn timeline_path(&self) -> String {
    if self.is_pixelfed() {
      format!("api/pixelfed/v1/accounts/{}/statuses", self.user_id)
    } else {
      format!("api/v1/accounts/{}/statuses", self.user_id)
    }
  }

  /// Absolute URL of the timeline endpoint, without query parameters.
  pub fn timeline_url(&self) -> Result<Url, url::ParseError> {
    self.host.join(&self.timeline_path())
  }

  /// The single cache file owned by this service.
  pub fn cache_path(&self) -> PathBuf {
    self.cache_dir.join(format!("{}.json", self.service))
  }

  /// `host` as written by the user, without a trailing slash.
  pub fn site_url(&self) -> String {
    self.host.as_str().trim_end_matches('/').to_string()
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./fedisync.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/fedisync/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create ./fedisync.yaml or ~/.config/fedisync/config.yaml"
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("fedisync.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("fedisync").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  /// Check required options and fill in defaults.
  pub fn validate(self) -> std::result::Result<Settings, SyncError> {
    let host = required(self.host, "host")?;
    let user_id = required(self.user_id, "userId")?;

    // Joining relative paths needs a trailing slash on the base.
    let base = format!("{}/", host.trim_end_matches('/'));
    let host = Url::parse(&base)
      .map_err(|e| SyncError::Config(format!("invalid host {:?}: {}", host, e)))?;

    let site = self.site.unwrap_or_else(|| {
      warn!("No site configured, defaulting to {:?}", DEFAULT_SITE);
      DEFAULT_SITE.to_string()
    });
    let service = self.service.unwrap_or_else(|| {
      warn!("No service configured, defaulting to {:?}", DEFAULT_SERVICE);
      DEFAULT_SERVICE.to_string()
    });

    Ok(Settings {
      host,
      user_id,
      site,
      service,
      remove_syndicates: self.remove_syndicates,
      is_production: self.is_production,
      exclude_replies: self.exclude_replies,
      exclude_reblogs: self.exclude_reblogs,
      cache_dir: self
        .cache_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
      timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
      alt_text: self.alt_text,
      user_agent: self.user_agent,
    })
  }
}

fn required(value: Option<String>, name: &str) -> std::result::Result<String, SyncError> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
    .ok_or_else(|| SyncError::Config(format!("missing required option `{}`", name)))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(yaml: &str) -> Config {
    Config::from_yaml(yaml).unwrap()
  }

  #[test]
  fn test_defaults() {
    let settings = parse("host: https://example.social\nuserId: \"42\"\n")
      .validate()
      .unwrap();

    assert_eq!(settings.site, "Mastodon");
    assert_eq!(settings.service, "mastodon");
    assert!(settings.is_production);
    assert_eq!(settings.exclude_replies, "true");
    assert_eq!(settings.exclude_reblogs, "true");
    assert!(settings.remove_syndicates.is_empty());
    assert_eq!(settings.alt_text, AltTextPolicy::First);
    assert_eq!(settings.cache_path(), PathBuf::from(".cache/mastodon.json"));
    assert_eq!(settings.timeout, Duration::from_secs(30));
  }

  #[test]
  fn test_numeric_user_id() {
    let config = parse("host: https://example.social\nuserId: 109876\n");
    assert_eq!(config.user_id.as_deref(), Some("109876"));
  }

  #[test]
  fn test_missing_host_is_config_error() {
    let err = parse("userId: \"42\"\n").validate().unwrap_err();
    assert!(matches!(err, SyncError::Config(msg) if msg.contains("host")));
  }

  #[test]
  fn test_blank_user_id_is_config_error() {
    let err = parse("host: https://example.social\nuserId: \"  \"\n")
      .validate()
      .unwrap_err();
    assert!(matches!(err, SyncError::Config(msg) if msg.contains("userId")));
  }

  #[test]
  fn test_invalid_host_is_config_error() {
    let err = parse("host: not a url\nuserId: \"1\"\n").validate().unwrap_err();
    assert!(matches!(err, SyncError::Config(_)));
  }

  #[test]
  fn test_full_config() {
    let yaml = r#"
host: https://pixel.example/
userId: "7"
site: Pixelfed
service: pixelfed
removeSyndicates:
  - https://blog.example/
isProduction: false
exclude_replies: "false"
exclude_reblogs: "true"
cacheDir: build/cache
timeoutSecs: 5
altText: all
"#;
    let settings = parse(yaml).validate().unwrap();

    assert_eq!(settings.site, "Pixelfed");
    assert!(settings.is_pixelfed());
    assert!(!settings.is_production);
    assert_eq!(settings.exclude_replies, "false");
    assert_eq!(settings.remove_syndicates, vec!["https://blog.example/"]);
    assert_eq!(settings.alt_text, AltTextPolicy::All);
    assert_eq!(settings.timeout, Duration::from_secs(5));
    assert_eq!(
      settings.cache_path(),
      PathBuf::from("build/cache/pixelfed.json")
    );
    assert_eq!(settings.site_url(), "https://pixel.example");
  }

  #[test]
  fn test_timeline_urls() {
    let mastodon = parse("host: https://example.social\nuserId: \"42\"\n")
      .validate()
      .unwrap();
    assert_eq!(
      mastodon.timeline_url().unwrap().as_str(),
      "https://example.social/api/v1/accounts/42/statuses"
    );

    let pixelfed = parse("host: https://pixel.example/\nuserId: \"7\"\nservice: pixelfed\n")
      .validate()
      .unwrap();
    assert_eq!(
      pixelfed.timeline_url().unwrap().as_str(),
      "https://pixel.example/api/pixelfed/v1/accounts/7/statuses"
    );
  }

  #[test]
  fn test_host_with_path_prefix() {
    let settings = parse("host: https://example.org/social\nuserId: \"1\"\n")
      .validate()
      .unwrap();
    assert_eq!(
      settings.timeline_url().unwrap().as_str(),
      "https://example.org/social/api/v1/accounts/1/statuses"
    );
    assert_eq!(settings.site_url(), "https://example.org/social");
  }
}
