pub use self::controller::SessionController;
pub use self::document::{Document, LogEntry, Panel, RoomListItem};

mod controller;
pub mod document;
mod outbox;
