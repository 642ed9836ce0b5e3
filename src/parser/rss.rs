use std::sync::Arc;

use chrono::{DateTime, Utc};
use rss::Channel;
use tracing::debug;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::feed::{ContentFactory, DefaultFactory, FeedContent, SharedFactory};
use crate::filter::{self, Filter};
use crate::parser::Parser;

/// RSS 0.91/0.92/2.0 parser, backed by the `rss` crate.
pub struct RssParser {
    factory: SharedFactory,
}

impl Default for RssParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RssParser {
    pub fn new() -> Self {
        Self {
            factory: Arc::new(DefaultFactory),
        }
    }
}

// RSS dates are RFC 2822, but feeds in the wild also carry RFC 3339.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| value.parse::<DateTime<Utc>>().ok())
}

impl Parser for RssParser {
    fn can_handle(&self, document: &Document) -> bool {
        document.root() == "rss"
    }

    fn parse(
        &self,
        document: &Document,
        feed: &mut FeedContent,
        filters: &[Filter],
    ) -> Result<()> {
        let channel = Channel::read_from(document.body())
            .map_err(|e| Error::Malformed(format!("Invalid RSS document: {}", e)))?;

        if !channel.title().is_empty() {
            feed.title = channel.title().to_string();
        }
        if !channel.description().is_empty() {
            feed.description = Some(channel.description().to_string());
        }
        if !channel.link().is_empty() {
            feed.link = Some(channel.link().to_string());
        }
        feed.updated = channel
            .last_build_date()
            .or(channel.pub_date())
            .and_then(parse_date);

        let mut items = Vec::with_capacity(channel.items().len());
        for entry in channel.items() {
            let mut item = self.factory.new_item();
            if let Some(title) = entry.title() {
                item.title = title.to_string();
            }
            item.link = entry.link().map(str::to_string);
            item.summary = entry.description().map(str::to_string);
            item.content = entry.content().map(str::to_string);
            item.author = entry.author().map(str::to_string);
            item.published = entry.pub_date().and_then(parse_date);
            if let Some(guid) = entry.guid() {
                item.id = guid.value().to_string();
            }
            item.categories = entry
                .categories()
                .iter()
                .map(|c| c.name().to_string())
                .collect();
            item.assign_fallback_id();
            items.push(item);
        }

        let kept = filter::apply(filters, items);
        debug!("RSS parse: {} items after filters", kept.len());
        feed.items.extend(kept);
        Ok(())
    }

    fn set_factory(&mut self, factory: SharedFactory) {
        self.factory = factory;
    }
}
