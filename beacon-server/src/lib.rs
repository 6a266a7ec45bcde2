pub mod config;
pub mod lobby;
pub mod signaling;

pub use config::ServerConfig;
pub use lobby::{LobbyBus, LobbyRegistry, LobbySnapshot, RegistryCommand, RegistryHandle};
pub use signaling::{router, ws_handler, AppState, Connection, Outbound, PeerSink, UserIdPool};
