#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAndUsername {
    pub session_id: String,
    pub username: String,
}

#[derive(Debug)]
/// [UserSessionHandle] proves that a specific user/session pair is a member of a specific room.
///
/// It is created when a user joins a room and is handed out to the user.
/// Messages can only be posted to a room through a handle, and the handle is consumed on leave.
pub struct UserSessionHandle {
    /// The name of the room which is associated with this handle
    room: String,
    /// The session and username associated with this handle
    session_and_username: SessionAndUsername,
}

impl UserSessionHandle {
    pub(super) fn new(room: String, session_and_username: SessionAndUsername) -> Self {
        UserSessionHandle {
            room,
            session_and_username,
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn session_id(&self) -> &str {
        &self.session_and_username.session_id
    }

    pub fn username(&self) -> &str {
        &self.session_and_username.username
    }
}
