pub mod atom;
pub mod rss;

pub use atom::AtomParser;
pub use rss::RssParser;

use crate::document::Document;
use crate::error::Result;
use crate::feed::{FeedContent, SharedFactory};
use crate::filter::Filter;

/// One feed dialect. `can_handle` is a cheap structural check on the
/// scanned root element and must be safe against any well-formed document;
/// `parse` fully hydrates the target, applying the filters to the item set
/// as it is assembled.
pub trait Parser: Send + Sync {
    fn can_handle(&self, document: &Document) -> bool;

    fn parse(
        &self,
        document: &Document,
        feed: &mut FeedContent,
        filters: &[Filter],
    ) -> Result<()>;

    /// Called by the reader at registration time; the factory is a shared
    /// dependency, not owned by the parser.
    fn set_factory(&mut self, factory: SharedFactory);
}
