pub mod client;
pub mod events;
pub mod subscribe;

pub use client::CloudFeed;
pub use events::{feed_topic, parse_feed_data, parse_publish, topic_feed};
pub use subscribe::Subscription;

use chrono::NaiveDateTime;
use portal_config::FeedConfig;
use portal_core::{FeedMessage, Result};
use tracing::{info, warn};

/// Remote telemetry service.
///
/// All calls are blocking and may fail; the polling loop treats any failure
/// as "no data" and carries on.
pub trait RemoteFeed {
    /// Readings since `start`, oldest first, at most `limit` of them.
    fn fetch_range(&mut self, start: NaiveDateTime, limit: usize) -> Result<Vec<f32>>;

    /// Publish one reading to the feed named `key`.
    fn send_value(&mut self, key: &str, value: f32) -> Result<()>;

    /// Next pushed value on the subscribed feed, without blocking.
    fn poll_incoming(&mut self) -> Option<FeedMessage>;
}

/// Build the configured cloud feed, `None` when disabled or misconfigured.
pub fn open_feed(cfg: &FeedConfig) -> Option<CloudFeed> {
    if !cfg.enabled {
        info!("Cloud feed disabled; running offline");
        return None;
    }
    match CloudFeed::new(cfg) {
        Ok(feed) => {
            info!("Cloud feed '{}' for {}", cfg.publish_feed, cfg.username);
            Some(feed)
        }
        Err(e) => {
            warn!("Cloud feed unavailable: {e}");
            None
        }
    }
}
