use beacon_core::{Envelope, Message, PeerId, SignalError};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

/// Frame queued for delivery to one peer's transport.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// Envelope to serialize onto the socket.
    Frame(Envelope),
    /// Shut the transport down. Sent when the peer's lobby is destroyed.
    Close,
}

/// Write handle for one connected peer's outbound queue.
///
/// The queue is owned by the peer's writer task; sends never block. A send
/// after the transport is gone is dropped, the registry call that produced
/// it has already completed.
#[derive(Debug, Clone)]
pub struct PeerSink {
    peer: PeerId,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl PeerSink {
    pub fn new(peer: PeerId) -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { peer, tx }, rx)
    }

    pub fn peer(&self) -> PeerId {
        self.peer
    }

    pub fn send(&self, frame: Outbound) {
        if self.tx.send(frame).is_err() {
            debug!(peer = %self.peer, "dropping frame for closed transport");
        }
    }

    /// Queue a server-originated push on `topic`.
    pub fn push(&self, topic: &str, event: &str, message: &Message) {
        self.send(Outbound::Frame(Envelope::push(topic, event, message)));
    }

    /// Queue an ok reply to the request carrying `reference`.
    pub fn reply_ok(&self, topic: &str, reference: Option<u64>, response: Value) {
        self.send(Outbound::Frame(Envelope::reply_ok(topic, reference, response)));
    }

    /// Queue an error reply to the request carrying `reference`.
    pub fn reply_error(&self, topic: &str, reference: Option<u64>, error: SignalError) {
        self.send(Outbound::Frame(Envelope::reply_error(topic, reference, error)));
    }

    /// Ask the writer task to close the transport.
    pub fn close(&self) {
        self.send(Outbound::Close);
    }
}
