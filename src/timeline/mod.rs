//! Remote timeline access: wire types, formatting, and the HTTP client.

pub mod api_types;
pub mod client;
pub mod format;
pub mod types;

pub use client::{TimelineClient, TimelineSource};
pub use types::{Emoji, Media, PageQuery, Post, TimelinePage};
