mod connection;
mod ids;
mod outbound;
mod ws_handler;

pub use connection::*;
pub use ids::*;
pub use outbound::*;
pub use ws_handler::*;
