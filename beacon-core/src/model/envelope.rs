use crate::error::SignalError;
use crate::model::message::Message;
use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Wire event names.
pub mod event {
    /// Channel handshake, required before any custom event on a topic.
    pub const PHX_JOIN: &str = "phx_join";
    /// Explicit channel leave.
    pub const PHX_LEAVE: &str = "phx_leave";
    /// Reply to a request frame, carrying `{status, response}`.
    pub const PHX_REPLY: &str = "phx_reply";
    /// Socket-level keepalive, sent on the `"phoenix"` topic.
    pub const HEARTBEAT: &str = "heartbeat";

    pub const JOIN: &str = "join";
    pub const ID: &str = "id";
    pub const PEER_CONNECT: &str = "peer_connect";
    pub const PEER_DISCONNECT: &str = "peer_disconnect";
    pub const OFFER: &str = "offer";
    pub const ANSWER: &str = "answer";
    pub const CANDIDATE: &str = "candidate";
    pub const SEAL: &str = "seal";
    pub const SEALED: &str = "sealed";
}

/// Topic prefix all lobby channels live under.
pub const LOBBY_TOPIC_PREFIX: &str = "lobby:";

/// Topic reserved for socket keepalive.
pub const SOCKET_TOPIC: &str = "phoenix";

/// One frame of the topic-based channel convention, both directions.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Ok,
    Error,
}

/// Payload of a `phx_reply` frame.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reply {
    pub status: ReplyStatus,
    pub response: Value,
}

impl Envelope {
    /// Ok reply to the request carrying `reference` on `topic`.
    pub fn reply_ok(topic: &str, reference: Option<u64>, response: Value) -> Self {
        Self::reply(topic, reference, ReplyStatus::Ok, response)
    }

    /// Error reply; the response body is `{"reason": <symbol>}`.
    pub fn reply_error(topic: &str, reference: Option<u64>, error: SignalError) -> Self {
        Self::reply(
            topic,
            reference,
            ReplyStatus::Error,
            json!({ "reason": error.reason() }),
        )
    }

    fn reply(topic: &str, reference: Option<u64>, status: ReplyStatus, response: Value) -> Self {
        let payload = Reply { status, response };
        Self {
            topic: topic.to_owned(),
            event: event::PHX_REPLY.to_owned(),
            payload: serde_json::to_value(payload).unwrap_or(Value::Null),
            reference,
        }
    }

    /// Server-originated push of a wire [`Message`] on `topic`.
    pub fn push(topic: &str, event: &str, message: &Message) -> Self {
        Self {
            topic: topic.to_owned(),
            event: event.to_owned(),
            payload: serde_json::to_value(message).unwrap_or(Value::Null),
            reference: None,
        }
    }

    /// Whether `topic` names a lobby channel.
    pub fn is_lobby_topic(topic: &str) -> bool {
        topic.strip_prefix(LOBBY_TOPIC_PREFIX).is_some()
    }
}

/// Payload of the `join` event.
///
/// An empty `data` asks the server to generate a fresh lobby name.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinPayload {
    pub data: String,
}

/// Payload of the `offer`/`answer`/`candidate` relay events.
///
/// `id` names the destination peer and must be a JSON integer. An inbound
/// `type` field is tolerated but ignored; the event name decides the opcode.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayPayload {
    pub id: PeerId,
    pub data: String,
    #[serde(default, rename = "type")]
    pub kind: Option<u8>,
}

/// Payload of the `seal` event. Carries nothing.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SealPayload {}
