use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::feed::{ContentFactory, DefaultFactory, FeedContent};
use crate::filter::Filter;
use crate::parser::{AtomParser, Parser, RssParser};
use crate::transport::{Response, Status, Transport};

/// How a `fetch` call narrows the parsed items: everything, at most n
/// items, or only items newer than a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    All,
    Limit(usize),
    Since(DateTime<Utc>),
}

/// Orchestrates one fetch-parse cycle: asks the transport for the document,
/// picks the first registered parser that recognizes it, and maps HTTP
/// failures into the error taxonomy before any parsing is attempted.
pub struct Reader {
    transport: Arc<dyn Transport>,
    factory: Arc<dyn ContentFactory>,
    parsers: Vec<Box<dyn Parser>>,
}

impl Reader {
    /// A reader with no parsers registered; every fetch will fail with
    /// `Error::NoParser` until at least one is added.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_factory(transport, Arc::new(DefaultFactory))
    }

    pub fn with_factory(
        transport: Arc<dyn Transport>,
        factory: Arc<dyn ContentFactory>,
    ) -> Self {
        Self {
            transport,
            factory,
            parsers: Vec::new(),
        }
    }

    /// A reader with the built-in parsers registered, RSS before Atom.
    pub fn with_default_parsers(transport: Arc<dyn Transport>) -> Self {
        let mut reader = Self::new(transport);
        reader.register_parser(Box::new(RssParser::new()));
        reader.register_parser(Box::new(AtomParser::new()));
        reader
    }

    /// Registers a parser. Registration order is the tie-break when more
    /// than one parser recognizes a document. The reader's factory is
    /// injected into the parser here.
    pub fn register_parser(&mut self, mut parser: Box<dyn Parser>) {
        parser.set_factory(self.factory.clone());
        self.parsers.push(parser);
    }

    /// Fetches and parses the feed at `url`, narrowed by `selector`.
    pub async fn fetch(&self, url: &str, selector: Selector) -> Result<FeedContent> {
        match selector {
            Selector::All => self.fetch_filtered(url, &[], None).await,
            Selector::Limit(n) => self.fetch_filtered(url, &[Filter::Limit(n)], None).await,
            Selector::Since(since) => self.fetch_since(url, since).await,
        }
    }

    /// Fetches with an explicit filter list and an optional conditional
    /// timestamp, independent of each other.
    pub async fn fetch_filtered(
        &self,
        url: &str,
        filters: &[Filter],
        since: Option<DateTime<Utc>>,
    ) -> Result<FeedContent> {
        let mut feed = self.factory.new_feed();
        let response = self.fetch_response(url, since).await?;
        self.parse_body(&response, &mut feed, filters)?;
        Ok(feed)
    }

    /// Fetches items newer than `since`. The cutoff doubles as the
    /// conditional-fetch timestamp, so an unchanged feed short-circuits
    /// server-side with `Error::NotModified`.
    pub async fn fetch_since(&self, url: &str, since: DateTime<Utc>) -> Result<FeedContent> {
        self.fetch_filtered(url, &[Filter::Since(since)], Some(since))
            .await
    }

    /// Like `fetch_since`, but hydrates the caller's feed in place instead
    /// of building a fresh one, for merge-style incremental updates.
    pub async fn fetch_into(
        &self,
        url: &str,
        feed: &mut FeedContent,
        since: DateTime<Utc>,
    ) -> Result<()> {
        let response = self.fetch_response(url, Some(since)).await?;
        self.parse_body(&response, feed, &[Filter::Since(since)])
    }

    /// One transport call, no retries. An absent timestamp is substituted
    /// with the epoch, meaning an unconditional fetch.
    pub async fn fetch_response(
        &self,
        url: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Response> {
        let modified_since = since.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        self.transport.fetch(url, modified_since).await
    }

    /// Maps the response status into the error taxonomy, then scans the
    /// body, selects a parser, and hydrates `feed`. No parser runs unless
    /// the status permits it.
    pub fn parse_body(
        &self,
        response: &Response,
        feed: &mut FeedContent,
        filters: &[Filter],
    ) -> Result<()> {
        match response.status {
            Status::Ok => {}
            Status::NotFound => return Err(Error::NotFound(response.message.clone())),
            Status::NotModified => return Err(Error::NotModified(response.message.clone())),
            Status::ServerError => return Err(Error::ServerError(response.message.clone())),
            Status::Forbidden => return Err(Error::Forbidden(response.message.clone())),
            Status::Other(code) => {
                return Err(Error::CannotBeRead {
                    code,
                    message: response.message.clone(),
                })
            }
        }

        let document = Document::scan(&response.body)?;
        let parser = self.select_parser(&document)?;
        parser.parse(&document, feed, filters)
    }

    /// First registered parser that recognizes the document wins.
    pub fn select_parser(&self, document: &Document) -> Result<&dyn Parser> {
        for parser in &self.parsers {
            if parser.can_handle(document) {
                debug!("Selected parser for root element <{}>", document.root());
                return Ok(parser.as_ref());
            }
        }
        warn!("No parser registered for root element <{}>", document.root());
        Err(Error::NoParser(document.root().to_string()))
    }
}
