use crate::config::ServerConfig;
use crate::lobby::{Lobby, LobbyBus, LobbySnapshot, RegistryCommand};
use crate::signaling::PeerSink;
use beacon_core::{event, Message, Opcode, PeerId, SignalError};
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Single source of truth for all lobby state.
///
/// One task owns the lobby map, the peer index and the broadcast bus, and
/// processes [`RegistryCommand`]s from its mailbox one at a time. Capacity
/// checks, membership mutation and the fan-out they trigger all happen inside
/// a single command execution, so no broadcast can observe a half-applied
/// join or leave. The task never touches the network: outbound traffic is
/// queued onto per-peer unbounded sinks.
pub struct LobbyRegistry {
    config: ServerConfig,
    lobbies: HashMap<String, Lobby>,
    /// Which lobby each connected peer is in. A peer appears at most once.
    peer_lobbies: HashMap<PeerId, String>,
    bus: LobbyBus,
    command_rx: mpsc::Receiver<RegistryCommand>,
    /// Handle onto our own mailbox, cloned into destruction timers.
    handle: RegistryHandle,
    /// Incarnation counter for lobby names (see [`RegistryCommand::Expire`]).
    next_epoch: u64,
}

impl LobbyRegistry {
    /// Spawn the registry task and return a handle to its mailbox.
    pub fn spawn(config: ServerConfig) -> RegistryHandle {
        let (tx, command_rx) = mpsc::channel(256);
        let handle = RegistryHandle { tx };

        let registry = Self {
            config,
            lobbies: HashMap::new(),
            peer_lobbies: HashMap::new(),
            bus: LobbyBus::new(),
            command_rx,
            handle: handle.clone(),
            next_epoch: 0,
        };
        tokio::spawn(registry.run());

        handle
    }

    async fn run(mut self) {
        info!("lobby registry started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!("lobby registry stopped");
    }

    fn handle_command(&mut self, cmd: RegistryCommand) {
        match cmd {
            RegistryCommand::Join {
                name,
                peer,
                topic,
                reference,
                sink,
                reply,
            } => {
                let result = self.join(name, peer, &topic, reference, sink);
                let _ = reply.send(result);
            }
            RegistryCommand::Leave { name, peer, reply } => {
                let _ = reply.send(self.leave(&name, peer));
            }
            RegistryCommand::Seal {
                name,
                peer,
                topic,
                reference,
                reply,
            } => {
                let _ = reply.send(self.seal(&name, peer, &topic, reference));
            }
            RegistryCommand::Relay {
                name,
                from,
                to,
                kind,
                data,
                reply,
            } => {
                let _ = reply.send(self.relay(&name, from, to, kind, data));
            }
            RegistryCommand::Destroy { name, reply } => {
                let _ = reply.send(self.destroy(&name));
            }
            RegistryCommand::Expire { name, epoch } => {
                let current = self.lobbies.get(&name).map(|l| l.epoch);
                if current == Some(epoch) {
                    let _ = self.destroy(&name);
                }
            }
            RegistryCommand::Members { name, reply } => {
                let result = self
                    .lobbies
                    .get(&name)
                    .map(Lobby::snapshot)
                    .ok_or(SignalError::LobbyNotFound);
                let _ = reply.send(result);
            }
            RegistryCommand::LobbyOf { peer, reply } => {
                let _ = reply.send(self.peer_lobbies.get(&peer).cloned());
            }
        }
    }

    fn join(
        &mut self,
        name: String,
        peer: PeerId,
        topic: &str,
        reference: Option<u64>,
        sink: PeerSink,
    ) -> Result<LobbySnapshot, SignalError> {
        if self.peer_lobbies.contains_key(&peer) {
            return Err(SignalError::AlreadyJoined);
        }

        let name = if name.is_empty() {
            self.generate_name()
        } else {
            name
        };

        match self.lobbies.get(&name) {
            Some(lobby) if lobby.sealed => return Err(SignalError::LobbySealed),
            Some(lobby) if lobby.peer_count() >= self.config.max_peers => {
                return Err(SignalError::MaxPeersReached)
            }
            Some(_) => {}
            None if self.lobbies.len() >= self.config.max_lobbies => {
                return Err(SignalError::MaxLobbiesReached)
            }
            None => {
                let epoch = self.next_epoch;
                self.next_epoch += 1;
                info!(lobby = %name, owner = %peer, "lobby created");
                self.lobbies
                    .insert(name.clone(), Lobby::new(name.clone(), peer, epoch));
            }
        }
        let Some(lobby) = self.lobbies.get_mut(&name) else {
            return Err(SignalError::LobbyNotFound);
        };

        let roster = lobby.peers().to_vec();
        lobby.add_peer(peer);
        let snapshot = lobby.snapshot();
        self.peer_lobbies.insert(peer, name.clone());

        // The joiner's queue, in protocol order: reply, own id, then the
        // roster so a late joiner learns of every present peer exactly once.
        sink.reply_ok(
            topic,
            reference,
            json!(Message::new(Opcode::Join, peer, name.as_str())),
        );
        sink.push(topic, event::ID, &Message::notice(Opcode::Id, peer));
        for present in &roster {
            sink.push(
                topic,
                event::PEER_CONNECT,
                &Message::notice(Opcode::PeerConnect, *present),
            );
        }

        // Announce before subscribing, so the joiner never sees itself.
        self.bus.broadcast(
            &name,
            event::PEER_CONNECT,
            &Message::notice(Opcode::PeerConnect, peer),
        );
        self.bus.subscribe(&name, topic.to_owned(), sink);

        Ok(snapshot)
    }

    fn leave(&mut self, name: &str, peer: PeerId) -> Result<(), SignalError> {
        let lobby = self
            .lobbies
            .get_mut(name)
            .ok_or(SignalError::LobbyNotFound)?;
        if !lobby.remove_peer(peer) {
            return Err(SignalError::NotAMember);
        }

        self.peer_lobbies.remove(&peer);
        self.bus.unsubscribe(name, peer);
        self.bus.broadcast(
            name,
            event::PEER_DISCONNECT,
            &Message::notice(Opcode::PeerDisconnect, peer),
        );

        if lobby.is_empty() {
            info!(lobby = %name, "last peer left, destroying lobby");
            self.lobbies.remove(name);
            self.bus.drop_topic(name);
        }

        Ok(())
    }

    fn seal(
        &mut self,
        name: &str,
        peer: PeerId,
        topic: &str,
        reference: Option<u64>,
    ) -> Result<(), SignalError> {
        let lobby = self
            .lobbies
            .get_mut(name)
            .ok_or(SignalError::LobbyNotFound)?;
        if lobby.owner != peer {
            return Err(SignalError::NotAuthorized);
        }

        if lobby.sealed {
            // Re-seal by the owner: ok, but no second broadcast or timer.
            if let Some((sink, _)) = self.bus.subscriber(name, peer) {
                sink.reply_ok(topic, reference, json!({}));
            }
            return Ok(());
        }

        lobby.sealed = true;
        let owner = lobby.owner;
        let epoch = lobby.epoch;
        info!(lobby = %name, %owner, grace = ?self.config.seal_grace, "lobby sealed");

        if let Some((sink, _)) = self.bus.subscriber(name, peer) {
            sink.reply_ok(topic, reference, json!({}));
        }
        self.bus
            .broadcast(name, event::SEALED, &Message::notice(Opcode::Seal, owner));

        let handle = self.handle.clone();
        let name = name.to_owned();
        let grace = self.config.seal_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            // A no-op if the lobby emptied and was destroyed early.
            handle.expire(&name, epoch).await;
        });

        Ok(())
    }

    fn relay(
        &mut self,
        name: &str,
        from: PeerId,
        to: PeerId,
        kind: Opcode,
        data: String,
    ) -> Result<(), SignalError> {
        let event = match kind {
            Opcode::Offer => event::OFFER,
            Opcode::Answer => event::ANSWER,
            Opcode::Candidate => event::CANDIDATE,
            _ => return Err(SignalError::BadRequest),
        };
        if !self.lobbies.contains_key(name) {
            return Err(SignalError::LobbyNotFound);
        }

        // Outbound id carries the sender, not the destination.
        let message = Message::new(kind, from, data);
        if !self.bus.send_to(name, to, event, &message) {
            // The destination may have left already; not an error.
            warn!(lobby = %name, %from, %to, "relay destination gone, dropping");
        }
        Ok(())
    }

    fn destroy(&mut self, name: &str) -> Result<(), SignalError> {
        let lobby = self.lobbies.remove(name).ok_or(SignalError::LobbyNotFound)?;
        for peer in lobby.peers() {
            self.peer_lobbies.remove(peer);
        }
        for sink in self.bus.drop_topic(name) {
            sink.close();
        }

        info!(lobby = %name, peers = lobby.peer_count(), "lobby destroyed");
        Ok(())
    }

    /// Fresh 128-bit random name, re-rolled on the off chance of a collision.
    fn generate_name(&self) -> String {
        loop {
            let name = Uuid::new_v4().simple().to_string();
            if !self.lobbies.contains_key(&name) {
                return name;
            }
        }
    }
}

/// Cloneable handle onto the registry mailbox.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    tx: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    /// Create-or-join `name` (empty for a generated one). On success the
    /// registry has already queued the reply, id and roster frames for the
    /// joiner and announced it to the rest of the lobby.
    pub async fn join(
        &self,
        name: &str,
        peer: PeerId,
        topic: &str,
        reference: Option<u64>,
        sink: PeerSink,
    ) -> Result<LobbySnapshot, SignalError> {
        let (reply, rx) = oneshot::channel();
        self.send(RegistryCommand::Join {
            name: name.to_owned(),
            peer,
            topic: topic.to_owned(),
            reference,
            sink,
            reply,
        })
        .await;
        Self::flatten(rx.await)
    }

    pub async fn leave(&self, name: &str, peer: PeerId) -> Result<(), SignalError> {
        let (reply, rx) = oneshot::channel();
        self.send(RegistryCommand::Leave {
            name: name.to_owned(),
            peer,
            reply,
        })
        .await;
        Self::flatten(rx.await)
    }

    pub async fn seal(
        &self,
        name: &str,
        peer: PeerId,
        topic: &str,
        reference: Option<u64>,
    ) -> Result<(), SignalError> {
        let (reply, rx) = oneshot::channel();
        self.send(RegistryCommand::Seal {
            name: name.to_owned(),
            peer,
            topic: topic.to_owned(),
            reference,
            reply,
        })
        .await;
        Self::flatten(rx.await)
    }

    pub async fn relay(
        &self,
        name: &str,
        from: PeerId,
        to: PeerId,
        kind: Opcode,
        data: String,
    ) -> Result<(), SignalError> {
        let (reply, rx) = oneshot::channel();
        self.send(RegistryCommand::Relay {
            name: name.to_owned(),
            from,
            to,
            kind,
            data,
            reply,
        })
        .await;
        Self::flatten(rx.await)
    }

    pub async fn destroy(&self, name: &str) -> Result<(), SignalError> {
        let (reply, rx) = oneshot::channel();
        self.send(RegistryCommand::Destroy {
            name: name.to_owned(),
            reply,
        })
        .await;
        Self::flatten(rx.await)
    }

    pub async fn members(&self, name: &str) -> Result<LobbySnapshot, SignalError> {
        let (reply, rx) = oneshot::channel();
        self.send(RegistryCommand::Members {
            name: name.to_owned(),
            reply,
        })
        .await;
        Self::flatten(rx.await)
    }

    pub async fn lobby_of(&self, peer: PeerId) -> Option<String> {
        let (reply, rx) = oneshot::channel();
        self.send(RegistryCommand::LobbyOf { peer, reply }).await;
        rx.await.ok().flatten()
    }

    pub(crate) async fn expire(&self, name: &str, epoch: u64) {
        self.send(RegistryCommand::Expire {
            name: name.to_owned(),
            epoch,
        })
        .await;
    }

    async fn send(&self, cmd: RegistryCommand) {
        if self.tx.send(cmd).await.is_err() {
            error!("lobby registry is gone");
        }
    }

    /// A closed mailbox means the server is shutting down; callers see the
    /// lobby as already gone.
    fn flatten<T>(
        result: Result<Result<T, SignalError>, oneshot::error::RecvError>,
    ) -> Result<T, SignalError> {
        result.unwrap_or(Err(SignalError::LobbyNotFound))
    }
}
