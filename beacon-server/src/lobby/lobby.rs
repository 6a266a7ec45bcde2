use beacon_core::PeerId;

/// One rendezvous room: its members, owner and sealed flag.
///
/// The owner is the peer whose join created the lobby and never changes,
/// even after that peer disconnects. Membership is an ordered set.
#[derive(Debug)]
pub struct Lobby {
    pub name: String,
    pub owner: PeerId,
    pub sealed: bool,
    /// Distinguishes incarnations of a reused name, so a stale destruction
    /// timer cannot tear down a lobby recreated under the same name.
    pub epoch: u64,
    peers: Vec<PeerId>,
}

impl Lobby {
    pub fn new(name: String, owner: PeerId, epoch: u64) -> Self {
        Self {
            name,
            owner,
            sealed: false,
            epoch,
            peers: Vec::new(),
        }
    }

    /// Members in join order.
    pub fn peers(&self) -> &[PeerId] {
        &self.peers
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn contains(&self, peer: PeerId) -> bool {
        self.peers.contains(&peer)
    }

    /// Append a member. Returns false if the peer is already present.
    pub fn add_peer(&mut self, peer: PeerId) -> bool {
        if self.contains(peer) {
            return false;
        }
        self.peers.push(peer);
        true
    }

    /// Remove a member. Returns false if the peer was not present.
    pub fn remove_peer(&mut self, peer: PeerId) -> bool {
        let before = self.peers.len();
        self.peers.retain(|p| *p != peer);
        self.peers.len() != before
    }

    pub fn snapshot(&self) -> LobbySnapshot {
        LobbySnapshot {
            name: self.name.clone(),
            owner: self.owner,
            sealed: self.sealed,
            peers: self.peers.clone(),
        }
    }
}

/// Point-in-time copy of a lobby, handed out across the registry boundary.
#[derive(Debug, Clone)]
pub struct LobbySnapshot {
    pub name: String,
    pub owner: PeerId,
    pub sealed: bool,
    pub peers: Vec<PeerId>,
}
