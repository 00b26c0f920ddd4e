/// A value pushed by the cloud service on a subscribed feed.
///
/// Delivered by polling the feed once per loop tick rather than through a
/// callback, so it is always handled before that tick's sensor and touch
/// processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMessage {
    /// Feed key, e.g. `"voltage"`.
    pub feed:    String,
    /// Raw payload as sent by the publisher.
    pub payload: String,
}

impl FeedMessage {
    pub fn new(feed: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            feed:    feed.into(),
            payload: payload.into(),
        }
    }
}
