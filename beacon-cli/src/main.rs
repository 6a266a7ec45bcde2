use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

use beacon_server::{router, AppState, LobbyRegistry, ServerConfig, UserIdPool};

#[derive(Parser)]
#[command(name = "beacon", about = "WebRTC lobby signaling server")]
struct Args {
    /// Socket address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Maximum log verbosity (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let registry = LobbyRegistry::spawn(ServerConfig::default());
    let state = AppState {
        registry,
        ids: UserIdPool::new(),
    };

    // Browser clients connect from arbitrary origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("signaling server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
