use portal_core::{FeedMessage, PortalError, Result};
use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::events::{feed_topic, parse_publish};

/// Pause between reconnect attempts after a connection error.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// MQTT subscription to one feed, polled without blocking.
///
/// A background thread drives the broker connection and forwards publishes
/// into a channel; [`Subscription::poll`] only drains that channel, so
/// messages are handed out in arrival order.
pub struct Subscription {
    client:   Client,
    messages: Receiver<FeedMessage>,
    topic:    String,
}

impl Subscription {
    /// Queue the subscribe request and start the connection thread.
    pub fn open(broker: &str, port: u16, username: &str, key: &str, feed: &str) -> Result<Self> {
        let mut opts = MqttOptions::new(format!("portal-{}", std::process::id()), broker, port);
        opts.set_credentials(username, key);
        opts.set_keep_alive(Duration::from_secs(30));

        let (client, connection) = Client::new(opts, 10);
        let topic = feed_topic(username, feed);
        client
            .subscribe(topic.clone(), QoS::AtMostOnce)
            .map_err(|e| PortalError::Transport(format!("subscribe '{topic}': {e}")))?;

        let (tx, rx) = mpsc::channel();
        let listening = topic.clone();
        thread::Builder::new()
            .name("portal-mqtt".into())
            .spawn(move || drive(connection, tx, &listening))
            .map_err(|e| PortalError::Transport(format!("mqtt thread: {e}")))?;

        Ok(Self {
            client,
            messages: rx,
            topic,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next publish received on the subscribed topic, if one is ready.
    pub fn poll(&mut self) -> Option<FeedMessage> {
        self.messages.try_recv().ok()
    }

    /// Ask the broker to close the session.  The connection thread exits
    /// once the request has been flushed.
    pub fn close(&mut self) {
        if let Err(e) = self.client.disconnect() {
            warn!("MQTT disconnect failed: {e}");
        }
    }
}

/// Run the connection until the client goes away or the receiver is dropped.
fn drive(mut connection: Connection, tx: Sender<FeedMessage>, topic: &str) {
    let mut connected = false;
    for event in connection.iter() {
        match event {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("Connected to MQTT broker; listening on {topic}");
                connected = true;
            }
            Ok(Event::Incoming(Packet::Publish(p))) => {
                if let Some(msg) = parse_publish(&p.topic, &p.payload) {
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                if connected {
                    warn!("MQTT connection lost: {e}");
                } else {
                    debug!("MQTT connect failed: {e}");
                }
                connected = false;
                thread::sleep(RETRY_DELAY);
            }
        }
    }
    debug!("MQTT connection thread for {topic} finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::time::Instant;

    /// Read one MQTT control packet: fixed header byte and body.
    fn read_packet(stream: &mut TcpStream) -> (u8, Vec<u8>) {
        let mut byte = [0u8; 1];
        stream.read_exact(&mut byte).unwrap();
        let header = byte[0];

        let (mut len, mut shift) = (0usize, 0);
        loop {
            stream.read_exact(&mut byte).unwrap();
            len |= usize::from(byte[0] & 0x7f) << shift;
            if byte[0] & 0x80 == 0 {
                break;
            }
            shift += 7;
        }

        let mut body = vec![0u8; len];
        stream.read_exact(&mut body).unwrap();
        (header, body)
    }

    /// Minimal broker: accept one client, ack its session and subscription,
    /// push `payload` on `topic`, then hold the socket open.
    fn loopback_broker(topic: &'static str, payload: &'static str) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();

            let (header, _) = read_packet(&mut stream);
            assert_eq!(header >> 4, 1, "expected CONNECT");
            stream.write_all(&[0x20, 0x02, 0x00, 0x00]).unwrap();

            let (header, body) = read_packet(&mut stream);
            assert_eq!(header >> 4, 8, "expected SUBSCRIBE");
            stream.write_all(&[0x90, 0x03, body[0], body[1], 0x00]).unwrap();

            let mut publish = vec![0x30, (2 + topic.len() + payload.len()) as u8];
            publish.extend_from_slice(&(topic.len() as u16).to_be_bytes());
            publish.extend_from_slice(topic.as_bytes());
            publish.extend_from_slice(payload.as_bytes());
            stream.write_all(&publish).unwrap();

            thread::sleep(Duration::from_secs(5));
        });
        port
    }

    #[test]
    fn delivers_publishes_without_blocking_poll() {
        let port = loopback_broker("alice/feeds/voltage", "3.3");
        let mut sub = Subscription::open("127.0.0.1", port, "alice", "secret", "voltage").unwrap();
        assert_eq!(sub.topic(), "alice/feeds/voltage");

        let deadline = Instant::now() + Duration::from_secs(3);
        let mut got = None;
        while Instant::now() < deadline {
            if let Some(msg) = sub.poll() {
                got = Some(msg);
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }
        assert_eq!(got, Some(FeedMessage::new("voltage", "3.3")));
        assert_eq!(sub.poll(), None);
        sub.close();
    }

    #[test]
    fn poll_is_empty_while_broker_unreachable() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let mut sub = Subscription::open("127.0.0.1", port, "alice", "secret", "voltage").unwrap();
        assert_eq!(sub.poll(), None);
        sub.close();
    }
}
