pub mod connection_tests;
pub mod messaging_tests;

use beacon_server::{router, AppState, LobbyRegistry, ServerConfig, UserIdPool};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// Seal grace short enough for tests to wait out.
pub const TEST_SEAL_GRACE_MS: u64 = 300;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        seal_grace: Duration::from_millis(TEST_SEAL_GRACE_MS),
        ..ServerConfig::default()
    }
}

/// Bind a full server on an ephemeral port and return its address.
pub async fn spawn_server(config: ServerConfig) -> SocketAddr {
    let registry = LobbyRegistry::spawn(config);
    let state = AppState {
        registry,
        ids: UserIdPool::new(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no local addr");

    tokio::spawn(async move {
        axum::serve(listener, router(state))
            .await
            .expect("test server failed");
    });

    addr
}
