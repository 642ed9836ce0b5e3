use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Parser;

use crate::error::Result;
use crate::reader::{Reader, Selector};
use crate::transport::HttpTransport;

#[derive(Parser)]
#[command(name = "feed-reader")]
#[command(about = "Fetch an RSS/Atom feed and print its items")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Feed URL to fetch
    pub url: String,

    /// Keep at most this many items
    #[arg(short, long, conflicts_with = "since")]
    pub limit: Option<usize>,

    /// Keep only items newer than this RFC 3339 timestamp
    /// (also sent as If-Modified-Since)
    #[arg(short, long)]
    pub since: Option<DateTime<Utc>>,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn selector(&self) -> Selector {
        match (self.limit, self.since) {
            (Some(n), _) => Selector::Limit(n),
            (None, Some(ts)) => Selector::Since(ts),
            (None, None) => Selector::All,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let transport =
            HttpTransport::new().with_timeout(Duration::from_secs(self.timeout));
        let reader = Reader::with_default_parsers(Arc::new(transport));

        let feed = reader.fetch(&self.url, self.selector()).await?;

        println!("{}", feed.title);
        if let Some(link) = &feed.link {
            println!("{}", link);
        }
        println!();

        for item in &feed.items {
            match &item.published {
                Some(ts) => println!("[{}] {}", ts.format("%Y-%m-%d %H:%M"), item.title),
                None => println!("[no date]         {}", item.title),
            }
            if self.verbose {
                if let Some(link) = &item.link {
                    println!("    {}", link);
                }
                if let Some(summary) = &item.summary {
                    println!("    {}", summary);
                }
            }
        }

        Ok(())
    }
}
