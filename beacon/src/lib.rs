pub mod proto {
    pub use beacon_core::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use beacon_server::*;
}
