use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one connected client, unique among live connections.
///
/// Zero is reserved on the wire to mean "no peer".
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PeerId(pub u32);

impl PeerId {
    /// Wire placeholder for "no peer".
    pub const NONE: PeerId = PeerId(0);
}

impl From<u32> for PeerId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
