mod bus;
mod lobby;
mod registry;
mod registry_command;

pub use bus::*;
pub use lobby::*;
pub use registry::*;
pub use registry_command::*;
