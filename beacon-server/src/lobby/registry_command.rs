use crate::lobby::LobbySnapshot;
use crate::signaling::PeerSink;
use beacon_core::{Opcode, PeerId, SignalError};
use tokio::sync::oneshot;

/// Requests processed by the registry task, one at a time.
///
/// Commands that succeed with outbound traffic (join replies, broadcasts,
/// relays) queue that traffic inside command execution, before the next
/// command is taken; the oneshot result only tells the caller whether to
/// send an error reply.
#[derive(Debug)]
pub enum RegistryCommand {
    /// Create-or-join. An empty `name` asks for a generated one.
    Join {
        name: String,
        peer: PeerId,
        /// Channel topic the peer handshook with; its replies and pushes are
        /// addressed to it.
        topic: String,
        reference: Option<u64>,
        sink: PeerSink,
        reply: oneshot::Sender<Result<LobbySnapshot, SignalError>>,
    },

    /// Remove a member, announcing `peer_disconnect` to the rest.
    Leave {
        name: String,
        peer: PeerId,
        reply: oneshot::Sender<Result<(), SignalError>>,
    },

    /// Freeze membership and start the destruction countdown. Owner only.
    Seal {
        name: String,
        peer: PeerId,
        topic: String,
        reference: Option<u64>,
        reply: oneshot::Sender<Result<(), SignalError>>,
    },

    /// Unicast an offer/answer/candidate, rewriting the sender id in.
    Relay {
        name: String,
        from: PeerId,
        to: PeerId,
        kind: Opcode,
        data: String,
        reply: oneshot::Sender<Result<(), SignalError>>,
    },

    /// Remove a lobby and close every member's transport.
    Destroy {
        name: String,
        reply: oneshot::Sender<Result<(), SignalError>>,
    },

    /// Timer-fired destruction of one lobby incarnation. A mismatched epoch
    /// means the lobby was destroyed early and recreated; the command is a
    /// no-op then.
    Expire { name: String, epoch: u64 },

    /// Ordered member list of a lobby.
    Members {
        name: String,
        reply: oneshot::Sender<Result<LobbySnapshot, SignalError>>,
    },

    /// Which lobby, if any, a peer currently belongs to.
    LobbyOf {
        peer: PeerId,
        reply: oneshot::Sender<Option<String>>,
    },
}
