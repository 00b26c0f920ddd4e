use chrono::NaiveDateTime;
use portal_core::{timestamp::parse_iso8601, FeedMessage, PortalError, Result};
use serde::Deserialize;
use tracing::debug;

/// One element of the feed data endpoint's JSON array.
///
/// `value` arrives as a string on most feeds but may be a bare number.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPoint {
    pub value:      serde_json::Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl DataPoint {
    fn reading(&self) -> Option<f32> {
        match &self.value {
            serde_json::Value::Number(n) => n.as_f64().map(|v| v as f32),
            serde_json::Value::String(s) => s.trim().parse::<f32>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
    }

    fn created(&self) -> Option<NaiveDateTime> {
        self.created_at.as_deref().and_then(|s| parse_iso8601(s).ok())
    }
}

/// Parse a feed data response into readings, oldest first.
///
/// The service lists newest first.  When every point carries a parsable
/// `created_at` the readings are ordered by it; otherwise the response order
/// is reversed.  Elements without a numeric value are skipped.
pub fn parse_feed_data(body: &str) -> Result<Vec<f32>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| PortalError::Malformed(format!("feed data: {e}")))?;

    let mut points: Vec<(Option<NaiveDateTime>, f32)> = Vec::with_capacity(raw.len());
    for item in raw {
        let point = match serde_json::from_value::<DataPoint>(item) {
            Ok(p) => p,
            Err(e) => {
                debug!("Skipping feed element: {e}");
                continue;
            }
        };
        match point.reading() {
            Some(v) => points.push((point.created(), v)),
            None => debug!("Skipping non-numeric feed value {}", point.value),
        }
    }

    if points.iter().all(|(t, _)| t.is_some()) {
        points.sort_by_key(|(t, _)| *t);
    } else {
        points.reverse();
    }

    Ok(points.into_iter().map(|(_, v)| v).collect())
}

/// MQTT topic for a feed, e.g. `alice/feeds/voltage`.
pub fn feed_topic(username: &str, feed: &str) -> String {
    format!("{username}/feeds/{feed}")
}

/// Extract the feed key from `user/feeds/key` or the short `user/f/key` form.
pub fn topic_feed(topic: &str) -> Option<&str> {
    let mut parts = topic.splitn(3, '/');
    let _user = parts.next()?;
    match parts.next()? {
        "feeds" | "f" => parts.next().filter(|k| !k.is_empty()),
        _ => None,
    }
}

/// Turn a raw publish into a [`FeedMessage`], `None` for foreign topics.
pub fn parse_publish(topic: &str, payload: &[u8]) -> Option<FeedMessage> {
    let feed = topic_feed(topic)?;
    Some(FeedMessage::new(
        feed,
        String::from_utf8_lossy(payload).trim().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_orders_by_created_at() {
        let body = r#"[
            {"value": "23.5", "created_at": "2021-03-04T12:00:00Z"},
            {"value": "22.0", "created_at": "2021-03-04T11:00:00Z"},
            {"value": 21, "created_at": "2021-03-04T10:00:00Z"}
        ]"#;
        assert_eq!(parse_feed_data(body).unwrap(), vec![21.0, 22.0, 23.5]);
    }

    #[test]
    fn parse_without_timestamps_reverses() {
        let body = r#"[{"value": "3"}, {"value": "2"}, {"value": "1"}]"#;
        assert_eq!(parse_feed_data(body).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn parse_skips_malformed_elements() {
        let body = r#"[
            {"value": "ON"},
            {"value": "20.5"},
            {"no_value": 1},
            {"value": null},
            "junk",
            {"value": "19.5"}
        ]"#;
        assert_eq!(parse_feed_data(body).unwrap(), vec![19.5, 20.5]);
    }

    #[test]
    fn parse_empty_array() {
        assert!(parse_feed_data("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_non_array() {
        assert!(matches!(
            parse_feed_data(r#"{"error": "not found"}"#),
            Err(PortalError::Malformed(_))
        ));
    }

    #[test]
    fn topic_round_trip() {
        let topic = feed_topic("alice", "voltage");
        assert_eq!(topic, "alice/feeds/voltage");
        assert_eq!(topic_feed(&topic), Some("voltage"));
        assert_eq!(topic_feed("alice/f/digital"), Some("digital"));
        assert_eq!(topic_feed("alice/errors"), None);
        assert_eq!(topic_feed("alice/feeds/"), None);
    }

    #[test]
    fn publish_payload_is_trimmed() {
        let msg = parse_publish("alice/feeds/voltage", b" 3.3\n").unwrap();
        assert_eq!(msg, FeedMessage::new("voltage", "3.3"));
        assert!(parse_publish("$SYS/broker", b"x").is_none());
    }
}
