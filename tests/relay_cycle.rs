// tests/relay_cycle.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use feed_relay::ingest::providers::rss::RssProvider;
use feed_relay::ingest::types::SourceProvider;
use feed_relay::{CycleOutcome, DelayRange, MessagePayload, PostedStore, PublishError, Publisher, Relay};

/// Records every payload; can be switched into failure mode.
#[derive(Default)]
struct RecordingPublisher {
    sent: Mutex<Vec<MessagePayload>>,
    fail: AtomicBool,
}

#[async_trait::async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, payload: &MessagePayload) -> Result<(), PublishError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::Rejected("simulated transport error".into()));
        }
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

fn rss(title: &str, link: &str, pub_date: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>{title} feed</title><link>https://feed.example/</link><description>d</description>
<item><title>{title}</title><link>{link}</link><description>&lt;p&gt;About {title}&lt;/p&gt;</description><pubDate>{pub_date}</pubDate></item>
</channel></rss>"#
    )
}

const U1: &str = "https://a.example/u1";
const U2: &str = "https://b.example/u2";

fn providers() -> Vec<Box<dyn SourceProvider>> {
    vec![
        Box::new(RssProvider::from_fixture(
            "Feed A",
            &rss("A", U1, "Tue, 02 Jan 2024 12:00:00 GMT"),
        )),
        Box::new(RssProvider::from_fixture(
            "Feed B",
            &rss("B", U2, "Wed, 03 Jan 2024 12:00:00 GMT"),
        )),
    ]
}

fn read_posted(path: &std::path::Path) -> Vec<String> {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn newest_first_then_older_then_idle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posted_messages.json");
    let store = PostedStore::load(&path).await.unwrap();
    let mut relay = Relay::new(
        providers(),
        store,
        RecordingPublisher::default(),
        DelayRange::default(),
    );

    assert_eq!(
        relay.run_cycle().await,
        CycleOutcome::Published { link: U2.into() }
    );
    assert_eq!(read_posted(&path), vec![U2.to_string()]);

    assert_eq!(
        relay.run_cycle().await,
        CycleOutcome::Published { link: U1.into() }
    );
    assert_eq!(read_posted(&path), vec![U1.to_string(), U2.to_string()]);

    assert_eq!(relay.run_cycle().await, CycleOutcome::Idle);

    let sent = relay.publisher().sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].text.starts_with("<b>B</b> (Feed B)\n"));
    assert!(sent[0].text.ends_with(&format!("<a href=\"{U2}\">Read more</a>")));
    assert!(sent[1].text.contains("About A"));
    assert!(sent.iter().all(|p| p.image_url.is_none()));
}

#[tokio::test]
async fn failed_publish_leaves_posted_set_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posted_messages.json");
    let publisher = RecordingPublisher::default();
    publisher.fail.store(true, Ordering::SeqCst);

    let mut relay = Relay::new(
        providers(),
        PostedStore::load(&path).await.unwrap(),
        publisher,
        DelayRange::default(),
    );

    assert_eq!(
        relay.run_cycle().await,
        CycleOutcome::PublishFailed { link: U2.into() }
    );
    assert!(relay.store().is_empty());
    assert!(!path.exists());

    // Same entry is retried once the endpoint recovers.
    relay.publisher().fail.store(false, Ordering::SeqCst);
    assert_eq!(
        relay.run_cycle().await,
        CycleOutcome::Published { link: U2.into() }
    );
    assert_eq!(read_posted(&path), vec![U2.to_string()]);
}

#[tokio::test]
async fn restart_does_not_repost() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posted_messages.json");

    let mut first = Relay::new(
        providers(),
        PostedStore::load(&path).await.unwrap(),
        RecordingPublisher::default(),
        DelayRange::default(),
    );
    first.run_cycle().await;
    first.run_cycle().await;
    drop(first);

    let mut second = Relay::new(
        providers(),
        PostedStore::load(&path).await.unwrap(),
        RecordingPublisher::default(),
        DelayRange::default(),
    );
    assert_eq!(second.run_cycle().await, CycleOutcome::Idle);
    assert!(second.publisher().sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_save_is_kept_in_memory_and_retried() {
    let dir = tempfile::tempdir().unwrap();
    // Parent of the store is a regular file, so every save fails.
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "x").unwrap();
    let path = blocker.join("posted_messages.json");

    let mut relay = Relay::new(
        providers(),
        PostedStore::new(&path),
        RecordingPublisher::default(),
        DelayRange::default(),
    );

    assert_eq!(
        relay.run_cycle().await,
        CycleOutcome::Published { link: U2.into() }
    );
    assert!(relay.store().is_dirty());
    assert!(relay.store().contains(U2));

    // Next cycle still moves on to the older entry rather than reposting.
    assert_eq!(
        relay.run_cycle().await,
        CycleOutcome::Published { link: U1.into() }
    );
    assert!(relay.store().is_dirty());
}

#[tokio::test]
async fn broken_source_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut providers = providers();
    providers.insert(0, Box::new(RssProvider::from_fixture("Broken", "<html>oops</html>")));

    let mut relay = Relay::new(
        providers,
        PostedStore::new(dir.path().join("posted.json")),
        RecordingPublisher::default(),
        DelayRange::default(),
    );
    assert_eq!(
        relay.run_cycle().await,
        CycleOutcome::Published { link: U2.into() }
    );
}
