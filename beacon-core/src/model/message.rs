use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};

/// Wire opcode. Carried as a bare integer in the `type` field.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(into = "u8", try_from = "u8")]
pub enum Opcode {
    /// Client requests lobby membership; server confirms with the resolved name.
    Join = 0,
    /// Server tells a fresh member its own peer id.
    Id = 1,
    /// Server announces a peer to the rest of its lobby.
    PeerConnect = 2,
    /// Server announces that a peer left its lobby.
    PeerDisconnect = 3,
    /// SDP offer relayed between two peers of one lobby.
    Offer = 4,
    /// SDP answer relayed between two peers of one lobby.
    Answer = 5,
    /// ICE candidate relayed between two peers of one lobby.
    Candidate = 6,
    /// Owner freezes the lobby and starts the destruction countdown.
    Seal = 7,
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Opcode::Join),
            1 => Ok(Opcode::Id),
            2 => Ok(Opcode::PeerConnect),
            3 => Ok(Opcode::PeerDisconnect),
            4 => Ok(Opcode::Offer),
            5 => Ok(Opcode::Answer),
            6 => Ok(Opcode::Candidate),
            7 => Ok(Opcode::Seal),
            other => Err(format!("unknown opcode {other}")),
        }
    }
}

/// The wire object carried in event payloads, both directions.
///
/// `id` is the destination peer on inbound relays and the sending peer on
/// outbound ones; on Id/PeerConnect/PeerDisconnect it names the subject peer.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct Message {
    pub id: PeerId,
    #[serde(rename = "type")]
    pub kind: Opcode,
    pub data: String,
}

impl Message {
    pub fn new(kind: Opcode, id: PeerId, data: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            data: data.into(),
        }
    }

    /// A message whose meaning is carried entirely by opcode and peer id.
    pub fn notice(kind: Opcode, id: PeerId) -> Self {
        Self::new(kind, id, "")
    }
}
