//! Persistent post cache.
//!
//! This module provides:
//! - A single-document storage abstraction with an atomic JSON file backend
//! - The merge step that folds freshly fetched posts into the cached set

mod merge;
mod storage;
mod traits;

pub use merge::merge;
pub use storage::{CacheStorage, JsonFileStorage};
pub use traits::{CacheDocument, Cacheable};
