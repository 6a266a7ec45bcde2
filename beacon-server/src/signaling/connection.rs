use crate::lobby::RegistryHandle;
use crate::signaling::PeerSink;
use beacon_core::{
    event, Envelope, JoinPayload, Opcode, PeerId, RelayPayload, SealPayload, SignalError,
    SOCKET_TOPIC,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Protocol state machine for one connected peer.
///
/// Translates inbound envelopes into registry calls. Owns no lobby state
/// beyond names: every structural mutation happens on the registry task, and
/// all outbound traffic is queued on the peer's sink.
pub struct Connection {
    peer: PeerId,
    sink: PeerSink,
    registry: RegistryHandle,
    /// Channel topic accepted at the `phx_join` handshake.
    channel: Option<String>,
    /// Resolved lobby name after a successful `join`.
    lobby: Option<String>,
}

impl Connection {
    pub fn new(peer: PeerId, sink: PeerSink, registry: RegistryHandle) -> Self {
        Self {
            peer,
            sink,
            registry,
            channel: None,
            lobby: None,
        }
    }

    pub fn peer(&self) -> PeerId {
        self.peer
    }

    /// Handle one inbound text frame. Protocol failures become error replies
    /// scoped to the frame; they never tear the connection down.
    pub async fn on_frame(&mut self, raw: &str) {
        let frame: Envelope = match serde_json::from_str(raw) {
            Ok(frame) => frame,
            Err(err) => {
                // No parseable envelope, so no topic or ref to address an
                // error reply to.
                warn!(peer = %self.peer, %err, "dropping unparseable frame");
                return;
            }
        };

        match frame.event.as_str() {
            event::HEARTBEAT if frame.topic == SOCKET_TOPIC => {
                self.sink.reply_ok(SOCKET_TOPIC, frame.reference, json!({}));
            }
            event::PHX_JOIN => self.on_channel_join(&frame),
            event::PHX_LEAVE => self.on_channel_leave(&frame).await,
            _ => self.on_channel_event(&frame).await,
        }
    }

    fn on_channel_join(&mut self, frame: &Envelope) {
        if !Envelope::is_lobby_topic(&frame.topic) {
            warn!(peer = %self.peer, topic = %frame.topic, "handshake on unknown topic");
            self.sink
                .reply_error(&frame.topic, frame.reference, SignalError::BadRequest);
            return;
        }
        if self.channel.is_some() {
            self.sink
                .reply_error(&frame.topic, frame.reference, SignalError::AlreadyJoined);
            return;
        }

        self.channel = Some(frame.topic.clone());
        self.sink.reply_ok(&frame.topic, frame.reference, json!({}));
    }

    async fn on_channel_leave(&mut self, frame: &Envelope) {
        if self.channel.as_deref() != Some(frame.topic.as_str()) {
            self.sink
                .reply_error(&frame.topic, frame.reference, SignalError::BadRequest);
            return;
        }

        if let Some(name) = self.lobby.take() {
            // The lobby may already be gone if it was destroyed around us.
            let _ = self.registry.leave(&name, self.peer).await;
        }
        self.channel = None;
        self.sink.reply_ok(&frame.topic, frame.reference, json!({}));
    }

    async fn on_channel_event(&mut self, frame: &Envelope) {
        if self.channel.as_deref() != Some(frame.topic.as_str()) {
            debug!(peer = %self.peer, topic = %frame.topic, "event outside the joined channel");
            self.sink
                .reply_error(&frame.topic, frame.reference, SignalError::BadRequest);
            return;
        }

        let result = match frame.event.as_str() {
            event::JOIN => self.on_join(frame).await,
            event::OFFER => self.on_relay(frame, Opcode::Offer).await,
            event::ANSWER => self.on_relay(frame, Opcode::Answer).await,
            event::CANDIDATE => self.on_relay(frame, Opcode::Candidate).await,
            event::SEAL => self.on_seal(frame).await,
            // Peer events are server-originated only.
            event::PEER_CONNECT | event::PEER_DISCONNECT => Err(SignalError::BadRequest),
            other => {
                debug!(peer = %self.peer, event = %other, "unknown event");
                Err(SignalError::BadRequest)
            }
        };

        if let Err(error) = result {
            self.sink.reply_error(&frame.topic, frame.reference, error);
        }
    }

    async fn on_join(&mut self, frame: &Envelope) -> Result<(), SignalError> {
        if self.lobby.is_some() {
            return Err(SignalError::AlreadyJoined);
        }
        let payload: JoinPayload = parse_payload(&frame.payload)?;

        let snapshot = self
            .registry
            .join(
                &payload.data,
                self.peer,
                &frame.topic,
                frame.reference,
                self.sink.clone(),
            )
            .await?;

        // The reply, id and roster frames were queued by the registry in
        // protocol order.
        self.lobby = Some(snapshot.name);
        Ok(())
    }

    async fn on_relay(&mut self, frame: &Envelope, kind: Opcode) -> Result<(), SignalError> {
        let name = self.lobby.as_deref().ok_or(SignalError::NotJoined)?;
        let payload: RelayPayload = parse_payload(&frame.payload)?;

        self.registry
            .relay(name, self.peer, payload.id, kind, payload.data)
            .await
    }

    async fn on_seal(&mut self, frame: &Envelope) -> Result<(), SignalError> {
        let name = self.lobby.as_deref().ok_or(SignalError::NotJoined)?;
        if !frame.payload.is_null() {
            let _: SealPayload = parse_payload(&frame.payload)?;
        }

        self.registry
            .seal(name, self.peer, &frame.topic, frame.reference)
            .await
    }
}

fn parse_payload<T: DeserializeOwned>(payload: &Value) -> Result<T, SignalError> {
    serde_json::from_value(payload.clone()).map_err(|_| SignalError::BadRequest)
}
