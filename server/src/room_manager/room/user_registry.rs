use std::collections::{HashMap, HashSet};

use super::user_session_handle::UserSessionHandle;

/// [UserRegistry] is a smart container for keeping track of which unique list of users are in a room
///
/// Since a user can have multiple sessions, we need to keep track of which sessions belong to which users.
/// The roster keeps the order in which users first joined.
#[derive(Debug, Default)]
pub struct UserRegistry {
    username_to_sessions: HashMap<String, HashSet<String>>,
    roster: Vec<String>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session to the room, returns true if the user is a new user
    pub fn insert(&mut self, user_session_handle: &UserSessionHandle) -> bool {
        let username = String::from(user_session_handle.username());
        let session_id = String::from(user_session_handle.session_id());

        let sessions = self
            .username_to_sessions
            .entry(username.clone())
            .or_default();

        sessions.insert(session_id);

        let is_new_user = sessions.len() == 1;

        if is_new_user {
            self.roster.push(username);
        }

        is_new_user
    }

    /// Removes a given session from the participant list, returns true if the user is no longer in the room
    /// Does nothing and returns false if the user does not exist
    pub fn remove(&mut self, user_session_handle: &UserSessionHandle) -> bool {
        let username = user_session_handle.username();

        let Some(sessions) = self.username_to_sessions.get_mut(username) else {
            return false;
        };

        sessions.remove(user_session_handle.session_id());

        if !sessions.is_empty() {
            return false;
        }

        self.username_to_sessions.remove(username);
        self.roster.retain(|existing| existing != username);

        true
    }

    /// Usernames currently in the room, in join order
    pub fn roster(&self) -> Vec<String> {
        self.roster.clone()
    }
}
