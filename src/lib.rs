pub mod cli;
pub mod document;
pub mod error;
pub mod feed;
pub mod filter;
pub mod parser;
pub mod reader;
pub mod transport;

pub use error::{Error, Result};
pub use feed::{ContentFactory, FeedContent, Item};
pub use filter::Filter;
pub use reader::{Reader, Selector};
pub use transport::{HttpTransport, Response, Status, Transport};
