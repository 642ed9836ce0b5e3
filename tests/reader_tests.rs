use std::sync::Arc;

use chrono::{DateTime, Utc};
use feed_reader::{Error, FeedContent, Filter, HttpTransport, Reader, Selector};
use wiremock::matchers::{headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_data::*;

fn reader() -> Reader {
    Reader::with_default_parsers(Arc::new(HttpTransport::new()))
}

async fn serve(status: u16, body: &str) -> (MockServer, String) {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&mock_server)
        .await;
    let url = format!("{}/feed.xml", mock_server.uri());
    (mock_server, url)
}

#[tokio::test]
async fn test_end_to_end_rss_fetch() {
    let (_server, url) = serve(200, TECH_NEWS_RSS).await;

    let feed = reader().fetch(&url, Selector::All).await.unwrap();

    assert_eq!(feed.title, "Tech News Daily");
    assert_eq!(
        feed.description.as_deref(),
        Some("Latest technology news and updates")
    );
    assert_eq!(feed.items.len(), 3);

    let first = &feed.items[0];
    assert_eq!(first.title, "AI Revolution in 2024");
    assert_eq!(first.categories, vec!["AI"]);
    assert!(first.published.is_some());

    // CDATA description comes through unescaped.
    assert!(feed.items[1]
        .summary
        .as_deref()
        .unwrap()
        .contains("<strong>quantum computing</strong>"));

    // Item without a guid still gets a stable id.
    assert!(!feed.items[2].id.is_empty());
}

#[tokio::test]
async fn test_end_to_end_atom_fetch() {
    let (_server, url) = serve(200, RELEASE_NOTES_ATOM).await;

    let feed = reader().fetch(&url, Selector::All).await.unwrap();

    assert_eq!(feed.title, "Release Notes");
    assert_eq!(feed.items.len(), 2);
    assert_eq!(feed.items[0].title, "v2.1.0");
    assert_eq!(feed.items[0].author.as_deref(), Some("Release Bot"));
}

#[tokio::test]
async fn test_limit_selector_keeps_first_in_document_order() {
    let (_server, url) = serve(200, RELEASE_NOTES_ATOM).await;

    let feed = reader().fetch(&url, Selector::Limit(1)).await.unwrap();

    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].title, "v2.1.0");
}

#[tokio::test]
async fn test_since_selector_filters_and_sends_conditional_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        // wiremock canonicalizes header values by splitting on commas, so
        // the one RFC 1123 date must be matched as its comma-split parts.
        .and(headers(
            "If-Modified-Since",
            vec!["Thu", "14 Mar 2024 00:00:00 GMT"],
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(RELEASE_NOTES_ATOM))
        .mount(&mock_server)
        .await;

    let since: DateTime<Utc> = "2024-03-14T00:00:00Z".parse().unwrap();
    let url = format!("{}/feed.xml", mock_server.uri());
    let feed = reader().fetch(&url, Selector::Since(since)).await.unwrap();

    // v2.0.1 (March 10) is older than the cutoff and dropped.
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].title, "v2.1.0");
}

#[tokio::test]
async fn test_not_modified_short_circuit() {
    let (_server, url) = serve(304, "").await;

    let since: DateTime<Utc> = "2024-03-14T00:00:00Z".parse().unwrap();
    let result = reader().fetch_since(&url, since).await;

    assert!(matches!(result, Err(Error::NotModified(_))));
}

#[tokio::test]
async fn test_not_found_maps_to_typed_error() {
    let (_server, url) = serve(404, "").await;

    let result = reader().fetch(&url, Selector::All).await;

    match result {
        Err(Error::NotFound(msg)) => assert_eq!(msg, "Not Found"),
        other => panic!("Expected NotFound, got {:?}", other.map(|f| f.title)),
    }
}

#[tokio::test]
async fn test_forbidden_maps_to_typed_error() {
    let (_server, url) = serve(403, "").await;

    let result = reader().fetch(&url, Selector::All).await;
    let err = result.unwrap_err();

    assert!(matches!(err, Error::Forbidden(_)));
    assert_eq!(err.status_code(), Some(403));
}

#[tokio::test]
async fn test_server_error_maps_to_typed_error() {
    let (_server, url) = serve(500, "").await;

    let result = reader().fetch(&url, Selector::All).await;
    let err = result.unwrap_err();

    assert!(matches!(err, Error::ServerError(_)));
    assert!(err.is_temporary());
}

#[tokio::test]
async fn test_unrecognized_document_fails_selection() {
    let (_server, url) = serve(200, OPML_DOCUMENT).await;

    let result = reader().fetch(&url, Selector::All).await;

    match result {
        Err(Error::NoParser(root)) => assert_eq!(root, "opml"),
        other => panic!("Expected NoParser, got {:?}", other.map(|f| f.title)),
    }
}

#[tokio::test]
async fn test_malformed_document_is_unified_error() {
    let (_server, url) = serve(200, MALFORMED_XML).await;

    let result = reader().fetch(&url, Selector::All).await;

    assert!(matches!(result, Err(Error::Malformed(_))));
}

#[tokio::test]
async fn test_fetch_into_accumulates_across_reads() {
    let (_server, url) = serve(200, RELEASE_NOTES_ATOM).await;

    let reader = reader();
    let mut feed = FeedContent::default();

    // First pass picks up only the newest entry.
    let since: DateTime<Utc> = "2024-03-14T00:00:00Z".parse().unwrap();
    reader.fetch_into(&url, &mut feed, since).await.unwrap();
    assert_eq!(feed.items.len(), 1);

    // An earlier cutoff on the same instance appends the older entry too.
    let earlier: DateTime<Utc> = "2024-03-01T00:00:00Z".parse().unwrap();
    reader.fetch_into(&url, &mut feed, earlier).await.unwrap();
    assert_eq!(feed.items.len(), 3);
    assert_eq!(feed.title, "Release Notes");
}

#[tokio::test]
async fn test_explicit_filters_intersect() {
    let (_server, url) = serve(200, TECH_NEWS_RSS).await;

    let cutoff: DateTime<Utc> = "2024-03-15T20:00:00Z".parse().unwrap();
    let feed = reader()
        .fetch_filtered(&url, &[Filter::Since(cutoff), Filter::Limit(1)], None)
        .await
        .unwrap();

    // Two items survive the cutoff; the limit keeps the first of those.
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].title, "AI Revolution in 2024");
}
