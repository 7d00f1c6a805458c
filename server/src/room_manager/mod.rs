pub use self::room::{RoomJoin, SessionAndUsername, UserSessionHandle};

pub use self::room_manager::RoomManager;

mod room;
#[allow(clippy::module_inception)]
mod room_manager;

/// Failures of room operations that are reported back to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("Room already exists!")]
    AlreadyExists(String),
    #[error("Room \"{0}\" not found")]
    NotFound(String),
    #[error("Already joined room \"{0}\"")]
    AlreadyJoined(String),
    #[error("Room name can not be empty")]
    EmptyName,
}

#[derive(Debug)]
pub struct RoomManagerBuilder {
    rooms: Vec<String>,
    history_limit: usize,
}

impl RoomManagerBuilder {
    pub fn new() -> Self {
        RoomManagerBuilder {
            rooms: Vec::new(),
            history_limit: 100,
        }
    }

    /// Add a room that exists from start up
    /// Duplicate names are only added once
    pub fn create_room(mut self, name: &str) -> Self {
        if !self.rooms.iter().any(|existing| existing == name) {
            self.rooms.push(String::from(name));
        }

        self
    }

    /// Maximum number of messages each room remembers for late joiners
    pub fn history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;

        self
    }

    pub fn build(self) -> RoomManager {
        RoomManager::new(self.rooms, self.history_limit)
    }
}
