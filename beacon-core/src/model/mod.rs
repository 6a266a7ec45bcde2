mod envelope;
mod message;
mod peer;

pub use envelope::{
    event, Envelope, JoinPayload, RelayPayload, Reply, ReplyStatus, SealPayload,
    LOBBY_TOPIC_PREFIX, SOCKET_TOPIC,
};
pub use message::{Message, Opcode};
pub use peer::PeerId;
