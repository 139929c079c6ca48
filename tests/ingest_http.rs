// tests/ingest_http.rs
use feed_relay::ingest::fetch_all;
use feed_relay::ingest::providers::rss::{build_providers, feed_client, USER_AGENT};
use feed_relay::FeedSource;

const PHORONIX_XML: &str = include_str!("fixtures/phoronix_rss.xml");

#[tokio::test]
async fn fetches_with_identifying_header_and_skips_failures() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("GET", "/phoronix.xml")
        .match_header("user-agent", USER_AGENT)
        .with_status(200)
        .with_header("content-type", "application/rss+xml")
        .with_body(PHORONIX_XML)
        .create_async()
        .await;
    let down = server
        .mock("GET", "/down.xml")
        .with_status(503)
        .create_async()
        .await;

    let sources = vec![
        FeedSource::new("Down", format!("{}/down.xml", server.url())),
        FeedSource::new("Phoronix", format!("{}/phoronix.xml", server.url())),
    ];
    let client = feed_client().unwrap();
    let providers = build_providers(&sources, &client);

    let entries = fetch_all(&providers).await;
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.source == "Phoronix"));

    ok.assert_async().await;
    down.assert_async().await;
}
