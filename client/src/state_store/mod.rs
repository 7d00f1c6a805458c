pub use self::state::{ServerConnectionStatus, State};
pub use self::state_store::StateStore;

pub mod action;
mod state;
#[allow(clippy::module_inception)]
mod state_store;
