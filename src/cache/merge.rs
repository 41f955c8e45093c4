use std::collections::HashSet;

use super::traits::Cacheable;

/// Union `incoming` and `existing` by key, newest first.
///
/// When a key appears in both, the `incoming` entity survives. Entities with
/// equal timestamps keep their relative order from `incoming ++ existing`.
pub fn merge<T: Cacheable>(incoming: Vec<T>, existing: Vec<T>) -> Vec<T> {
  let mut seen: HashSet<String> = HashSet::with_capacity(incoming.len() + existing.len());
  let mut merged: Vec<T> = incoming
    .into_iter()
    .chain(existing)
    .filter(|entity| seen.insert(entity.cache_key().to_string()))
    .collect();

  // sort_by is stable
  merged.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
  merged
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::timeline::Post;
  use chrono::{Duration, TimeZone, Utc};

  fn post(id: &str, minute: i64, content: &str) -> Post {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Post {
      date: base + Duration::minutes(minute),
      id: id.to_string(),
      content: content.to_string(),
      url: None,
      source_url: String::new(),
      site: "Mastodon".to_string(),
      site_url: "https://example.social".to_string(),
      service: "mastodon".to_string(),
      media: Vec::new(),
      emojis: Vec::new(),
      via: None,
      via_url: None,
    }
  }

  fn ids(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.id.as_str()).collect()
  }

  #[test]
  fn test_incoming_wins_on_conflict() {
    let existing = vec![post("5", 5, "old"), post("4", 4, "four")];
    let incoming = vec![post("5", 5, "new")];

    let merged = merge(incoming, existing);
    assert_eq!(ids(&merged), vec!["5", "4"]);
    assert_eq!(merged[0].content, "new");
  }

  #[test]
  fn test_sorted_newest_first() {
    let existing = vec![post("3", 3, ""), post("1", 1, "")];
    let incoming = vec![post("2", 2, ""), post("4", 4, "")];

    let merged = merge(incoming, existing);
    assert_eq!(ids(&merged), vec!["4", "3", "2", "1"]);
    assert!(merged
      .windows(2)
      .all(|w| w[0].published_at() >= w[1].published_at()));
  }

  #[test]
  fn test_merge_is_idempotent() {
    let existing = vec![post("3", 3, ""), post("2", 2, "")];
    let page = vec![post("4", 4, ""), post("3", 3, "edited")];

    let once = merge(page.clone(), existing);
    let twice = merge(page, once.clone());
    assert_eq!(once, twice);
  }

  #[test]
  fn test_keys_unique() {
    let existing = vec![post("1", 1, ""), post("1", 1, "dup")];
    let incoming = vec![post("2", 2, ""), post("2", 2, "dup"), post("1", 1, "fresh")];

    let merged = merge(incoming, existing);
    assert_eq!(ids(&merged), vec!["2", "1"]);
    assert_eq!(merged[0].content, "");
    assert_eq!(merged[1].content, "fresh");
  }

  #[test]
  fn test_equal_dates_keep_relative_order() {
    // Ids deliberately not monotonic with date
    let incoming = vec![post("b", 10, ""), post("a", 10, "")];
    let existing = vec![post("z", 10, ""), post("c", 20, "")];

    let merged = merge(incoming, existing);
    assert_eq!(ids(&merged), vec!["c", "b", "a", "z"]);
  }

  #[test]
  fn test_empty_inputs() {
    let merged: Vec<Post> = merge(Vec::new(), Vec::new());
    assert!(merged.is_empty());

    let merged = merge(Vec::new(), vec![post("1", 1, "")]);
    assert_eq!(ids(&merged), vec!["1"]);
  }
}
