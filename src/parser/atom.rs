use std::sync::Arc;

use feed_rs::parser as feed_parser;
use tracing::debug;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::feed::{ContentFactory, DefaultFactory, FeedContent, SharedFactory};
use crate::filter::{self, Filter};
use crate::parser::Parser;

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Atom parser, backed by `feed-rs`.
pub struct AtomParser {
    factory: SharedFactory,
}

impl Default for AtomParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomParser {
    pub fn new() -> Self {
        Self {
            factory: Arc::new(DefaultFactory),
        }
    }
}

impl Parser for AtomParser {
    fn can_handle(&self, document: &Document) -> bool {
        // Tolerate a missing xmlns; plenty of real feeds omit it.
        document.root() == "feed"
            && document.namespace().map_or(true, |ns| ns == ATOM_NAMESPACE)
    }

    fn parse(
        &self,
        document: &Document,
        feed: &mut FeedContent,
        filters: &[Filter],
    ) -> Result<()> {
        let parsed = feed_parser::parse(document.body())
            .map_err(|e| Error::Malformed(format!("Invalid Atom document: {}", e)))?;

        if let Some(title) = parsed.title {
            feed.title = title.content;
        }
        if let Some(description) = parsed.description {
            feed.description = Some(description.content);
        }
        if let Some(link) = parsed.links.first() {
            feed.link = Some(link.href.clone());
        }
        feed.updated = parsed.updated.or(parsed.published);

        let mut items = Vec::with_capacity(parsed.entries.len());
        for entry in parsed.entries {
            let mut item = self.factory.new_item();
            if let Some(title) = entry.title {
                item.title = title.content;
            }
            item.link = entry.links.first().map(|l| l.href.clone());
            item.summary = entry.summary.map(|s| s.content);
            item.content = entry.content.and_then(|c| c.body);
            item.author = entry.authors.first().map(|a| a.name.clone());
            item.published = entry.published.or(entry.updated);
            item.id = entry.id;
            item.categories = entry.categories.into_iter().map(|c| c.term).collect();
            item.assign_fallback_id();
            items.push(item);
        }

        let kept = filter::apply(filters, items);
        debug!("Atom parse: {} items after filters", kept.len());
        feed.items.extend(kept);
        Ok(())
    }

    fn set_factory(&mut self, factory: SharedFactory) {
        self.factory = factory;
    }
}
