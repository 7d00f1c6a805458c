use serde::{Deserialize, Serialize};

/// Identifier that pairs an acknowledged command with its [crate::event::AckEvent].
pub type AckId = u64;

/// User Command for announcing the username of the session. Must be the first command sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginCommand {
    // The self-declared name of the user.
    pub username: String,
}

/// User Command for creating a new room. The server answers with an ack carrying the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomCommand {
    // Correlates the server acknowledgement with this request.
    pub ack: AckId,
    // The name of the room to create.
    pub room_name: String,
}

/// User Command for joining a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomCommand {
    // The room to join.
    pub room: String,
}

/// User Command for leaving a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRoomCommand {
    // The room to leave.
    pub room: String,
}

/// User Command for sending a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageCommand {
    // The room to send the message to.
    pub room: String,
    // The content of the message.
    pub message: String,
}

/// User Command for quitting the whole chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuitCommand;

/// A user command which can be sent to the server by a single user session.
/// All commands are processed in the context of the chat server paired with an individual user session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UserCommand {
    Login(LoginCommand),
    CreateRoom(CreateRoomCommand),
    JoinRoom(JoinRoomCommand),
    LeaveRoom(LeaveRoomCommand),
    SendMessage(SendMessageCommand),
    Quit(QuitCommand),
}

impl UserCommand {
    /// The wire name of the command, used for logging
    pub fn name(&self) -> &'static str {
        match self {
            UserCommand::Login(_) => "login",
            UserCommand::CreateRoom(_) => "create_room",
            UserCommand::JoinRoom(_) => "join_room",
            UserCommand::LeaveRoom(_) => "leave_room",
            UserCommand::SendMessage(_) => "send_message",
            UserCommand::Quit(_) => "quit",
        }
    }
}
