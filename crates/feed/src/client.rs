use chrono::NaiveDateTime;
use portal_config::FeedConfig;
use portal_core::{timestamp::format_iso8601, FeedMessage, PortalError, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::events::parse_feed_data;
use crate::subscribe::Subscription;
use crate::RemoteFeed;

/// Cloud feed client: blocking REST calls for history and publishing, plus
/// an optional MQTT subscription for pushed values.
pub struct CloudFeed {
    agent:        ureq::Agent,
    base_url:     String,
    username:     String,
    key:          String,
    /// Feed read back by [`RemoteFeed::fetch_range`].
    history_feed: String,
    subscription: Option<Subscription>,
}

impl CloudFeed {
    /// Build the client.  A failed subscription is logged and the client
    /// continues without pushed values; an empty `broker` skips it.
    pub fn new(cfg: &FeedConfig) -> Result<Self> {
        if cfg.username.is_empty() {
            return Err(PortalError::Config("feed.username is empty".into()));
        }
        if !cfg.base_url.starts_with("http://") && !cfg.base_url.starts_with("https://") {
            return Err(PortalError::Config(
                "feed.base_url must start with http:// or https://".into(),
            ));
        }

        let key = cfg.resolved_key();
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(&format!("portal/{}", env!("CARGO_PKG_VERSION")))
            .build();

        let subscription = if cfg.broker.is_empty() {
            info!("No MQTT broker configured; feed view stays empty");
            None
        } else {
            match Subscription::open(
                &cfg.broker,
                cfg.port,
                &cfg.username,
                &key,
                &cfg.subscribe_feed,
            ) {
                Ok(s) => {
                    info!("Subscribing to {} on {}", s.topic(), cfg.broker);
                    Some(s)
                }
                Err(e) => {
                    warn!("Feed subscription unavailable: {e}");
                    None
                }
            }
        };

        Ok(Self {
            agent,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            username: cfg.username.clone(),
            key,
            history_feed: cfg.publish_feed.clone(),
            subscription,
        })
    }

    fn data_url(&self, feed: &str) -> String {
        data_url(&self.base_url, &self.username, feed)
    }
}

/// `{base}/{user}/feeds/{feed}/data`
pub fn data_url(base: &str, username: &str, feed: &str) -> String {
    format!("{base}/{username}/feeds/{feed}/data")
}

impl RemoteFeed for CloudFeed {
    fn fetch_range(&mut self, start: NaiveDateTime, limit: usize) -> Result<Vec<f32>> {
        let url = self.data_url(&self.history_feed);
        let start_time = format_iso8601(start);
        debug!("GET {url}?start_time={start_time}&limit={limit}");

        let body = self
            .agent
            .get(&url)
            .set("X-AIO-Key", &self.key)
            .set("Accept", "application/json")
            .query("start_time", &start_time)
            .query("limit", &limit.to_string())
            .call()
            .map_err(|e| PortalError::Transport(format!("fetch {}: {e}", self.history_feed)))?
            .into_string()
            .map_err(|e| PortalError::Transport(format!("read {}: {e}", self.history_feed)))?;

        parse_feed_data(&body)
    }

    fn send_value(&mut self, key: &str, value: f32) -> Result<()> {
        let url = self.data_url(key);
        let body = serde_json::json!({ "value": format!("{value:.2}") });

        self.agent
            .post(&url)
            .set("X-AIO-Key", &self.key)
            .send_json(body)
            .map_err(|e| PortalError::Transport(format!("send {key}: {e}")))?;
        Ok(())
    }

    fn poll_incoming(&mut self) -> Option<FeedMessage> {
        self.subscription.as_mut()?.poll()
    }
}

impl Drop for CloudFeed {
    fn drop(&mut self) {
        if let Some(sub) = self.subscription.as_mut() {
            sub.close();
        }
    }
}
