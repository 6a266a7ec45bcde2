use crate::signaling::PeerSink;
use beacon_core::{Message, PeerId};
use std::collections::HashMap;

/// Per-lobby fan-out of server-originated pushes.
///
/// Keyed by lobby name; each subscriber receives frames addressed to the
/// channel topic it handshook with, in publication order. Publication never
/// blocks: subscriber queues are unbounded and a gone subscriber only drops
/// its own frames.
///
/// Subscription changes and publication both happen on the registry task, so
/// a broadcast can never race a membership change.
#[derive(Debug, Default)]
pub struct LobbyBus {
    topics: HashMap<String, Vec<Subscriber>>,
}

#[derive(Debug)]
struct Subscriber {
    sink: PeerSink,
    /// Channel topic the peer handshook with; pushes are addressed to it.
    topic: String,
}

impl LobbyBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, lobby: &str, topic: String, sink: PeerSink) {
        self.topics
            .entry(lobby.to_owned())
            .or_default()
            .push(Subscriber { sink, topic });
    }

    pub fn unsubscribe(&mut self, lobby: &str, peer: PeerId) {
        if let Some(subs) = self.topics.get_mut(lobby) {
            subs.retain(|s| s.sink.peer() != peer);
            if subs.is_empty() {
                self.topics.remove(lobby);
            }
        }
    }

    /// Drop the whole topic, returning the sinks that were subscribed.
    pub fn drop_topic(&mut self, lobby: &str) -> Vec<PeerSink> {
        self.topics
            .remove(lobby)
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.sink)
            .collect()
    }

    /// Look up one subscriber's sink and channel topic.
    pub fn subscriber(&self, lobby: &str, peer: PeerId) -> Option<(&PeerSink, &str)> {
        self.topics
            .get(lobby)?
            .iter()
            .find(|s| s.sink.peer() == peer)
            .map(|s| (&s.sink, s.topic.as_str()))
    }

    /// Deliver `message` to every subscriber of `lobby`.
    pub fn broadcast(&self, lobby: &str, event: &str, message: &Message) {
        self.publish(lobby, None, event, message);
    }

    /// Deliver `message` to every subscriber of `lobby` except `sender`.
    pub fn broadcast_from(&self, lobby: &str, sender: PeerId, event: &str, message: &Message) {
        self.publish(lobby, Some(sender), event, message);
    }

    /// Unicast to a single subscriber. Returns false when the destination is
    /// not subscribed (it may have left; callers drop the message silently).
    pub fn send_to(&self, lobby: &str, dest: PeerId, event: &str, message: &Message) -> bool {
        match self.subscriber(lobby, dest) {
            Some((sink, topic)) => {
                sink.push(topic, event, message);
                true
            }
            None => false,
        }
    }

    fn publish(&self, lobby: &str, except: Option<PeerId>, event: &str, message: &Message) {
        let Some(subs) = self.topics.get(lobby) else {
            return;
        };
        for sub in subs {
            if except == Some(sub.sink.peer()) {
                continue;
            }
            sub.sink.push(&sub.topic, event, message);
        }
    }
}
