use beacon_core::PeerId;
use dashmap::DashSet;
use std::sync::Arc;

/// Assigns wire ids to transport connections.
///
/// Ids are random non-zero u32s, pairwise distinct among live connections.
/// An id returns to the pool when its connection closes and is never handed
/// out twice while its owner is still connected.
#[derive(Debug, Clone, Default)]
pub struct UserIdPool {
    live: Arc<DashSet<u32>>,
}

impl UserIdPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> PeerId {
        loop {
            let raw: u32 = rand::random();
            if raw != 0 && self.live.insert(raw) {
                return PeerId(raw);
            }
        }
    }

    pub fn release(&self, peer: PeerId) {
        self.live.remove(&peer.0);
    }

    /// Number of currently connected peers.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
