use std::time::Duration;

/// Registry-wide cap on concurrently existing lobbies.
pub const MAX_LOBBIES: usize = 1024;

/// Cap on the membership of a single lobby.
pub const MAX_PEERS: usize = 4096;

/// Grace period between a successful seal and lobby destruction.
pub const SEAL_GRACE: Duration = Duration::from_millis(10_000);
