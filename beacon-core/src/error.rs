use thiserror::Error;

/// Protocol-level failure, surfaced to the originating request as an error
/// reply. Never tears down the connection and never mutates lobby state.
///
/// The `Display` form of each variant is its wire reason symbol.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum SignalError {
    /// Malformed frame, missing field, wrong field type.
    #[error("bad_request")]
    BadRequest,
    /// Relay or seal attempted before a successful join.
    #[error("not_joined")]
    NotJoined,
    /// Operation against a lobby that no longer exists.
    #[error("lobby_not_found")]
    LobbyNotFound,
    /// Leave by a peer that is not a member of the lobby.
    #[error("not_a_member")]
    NotAMember,
    /// Join into a sealed lobby.
    #[error("lobby_sealed")]
    LobbySealed,
    /// Lobby already holds the maximum number of peers.
    #[error("max_peers_reached")]
    MaxPeersReached,
    /// Registry already holds the maximum number of lobbies.
    #[error("max_lobbies_reached")]
    MaxLobbiesReached,
    /// Seal attempted by a peer that does not own the lobby.
    #[error("not_authorized")]
    NotAuthorized,
    /// Second join from a connection that is already in a lobby.
    #[error("already_joined")]
    AlreadyJoined,
}

impl SignalError {
    /// The wire symbol sent in `{"reason": ...}` error payloads.
    pub fn reason(&self) -> &'static str {
        match self {
            SignalError::BadRequest => "bad_request",
            SignalError::NotJoined => "not_joined",
            SignalError::LobbyNotFound => "lobby_not_found",
            SignalError::NotAMember => "not_a_member",
            SignalError::LobbySealed => "lobby_sealed",
            SignalError::MaxPeersReached => "max_peers_reached",
            SignalError::MaxLobbiesReached => "max_lobbies_reached",
            SignalError::NotAuthorized => "not_authorized",
            SignalError::AlreadyJoined => "already_joined",
        }
    }
}
