pub mod error;
pub mod limits;
pub mod model;

pub use error::SignalError;
pub use model::*;
