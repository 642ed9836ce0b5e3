use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized representation of a syndication feed, independent of the
/// dialect it was parsed from. Parsers hydrate an existing instance in
/// place, so the same value can be re-used across repeated reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedContent {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub updated: Option<DateTime<Utc>>,
    pub items: Vec<Item>,
}

/// One entry within a feed. Lifetime is tied to the owning `FeedContent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
}

impl Item {
    /// Feeds are allowed to omit guids; fall back to a hash of the link so
    /// items stay addressable across fetches.
    pub fn assign_fallback_id(&mut self) {
        if self.id.is_empty() {
            if let Some(link) = &self.link {
                self.id = blake3::hash(link.as_bytes()).to_hex().to_string();
            }
        }
    }
}

/// Produces the empty, mutable value objects that parsers populate. The
/// reader injects its factory into every parser it registers, so a custom
/// factory (pre-seeded defaults, instrumentation) applies uniformly.
pub trait ContentFactory: Send + Sync {
    fn new_feed(&self) -> FeedContent;
    fn new_item(&self) -> Item;
}

/// Factory used unless the caller supplies one.
#[derive(Debug, Clone, Default)]
pub struct DefaultFactory;

impl ContentFactory for DefaultFactory {
    fn new_feed(&self) -> FeedContent {
        FeedContent {
            title: "Untitled Feed".to_string(),
            ..FeedContent::default()
        }
    }

    fn new_item(&self) -> Item {
        Item {
            title: "Untitled".to_string(),
            ..Item::default()
        }
    }
}

/// Shared factory handle, cloned into each registered parser.
pub type SharedFactory = Arc<dyn ContentFactory>;
