use beacon_core::limits;
use std::time::Duration;

/// Tunables for the lobby registry.
///
/// Defaults carry the protocol constants; tests shrink `seal_grace` to
/// exercise destruction without waiting out the full grace period.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Cap on concurrently existing lobbies.
    pub max_lobbies: usize,
    /// Cap on the membership of a single lobby.
    pub max_peers: usize,
    /// Delay between a successful seal and lobby destruction.
    pub seal_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_lobbies: limits::MAX_LOBBIES,
            max_peers: limits::MAX_PEERS,
            seal_grace: limits::SEAL_GRACE,
        }
    }
}
