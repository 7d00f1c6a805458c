use serde::{Deserialize, Serialize};

use crate::command::AckId;

/// Reply to a successful login, carrying the rooms known to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginSuccessfulReplyEvent {
    /// The username the session is registered under
    pub username: String,
    /// Names of the rooms that currently exist, in creation order
    pub rooms: Vec<String>,
}

/// Reply to an acknowledged command such as [crate::command::CreateRoomCommand]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckEvent {
    /// The id of the command being acknowledged
    pub ack: AckId,
    /// Whether the command was applied
    pub success: bool,
    /// Human readable outcome, present for both accepted and rejected commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A new room was created, broadcast to every session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCreatedBroadcastEvent {
    /// The name of the new room
    pub room: String,
    /// All room names after the creation
    #[serde(default)]
    pub rooms: Vec<String>,
}

/// A user has joined or left a room, broadcast to the members of the room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomParticipationBroadcastEvent {
    /// The name of the room the user has joined or left
    pub room: String,
    /// The username of the user that has joined or left
    pub username: String,
    /// The full roster of the room after the change, in join order
    pub users: Vec<String>,
}

/// A single chat message, as broadcast and as stored in the room history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The username of the sender
    pub username: String,
    /// The content of the message
    pub message: String,
    /// Server side wall clock time the message was received at, formatted as `HH:MM:SS`
    pub timestamp: String,
}

/// History of a room, sent to a session right after it joins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadMessagesReplyEvent {
    /// Messages in the order they were sent
    pub messages: Vec<ChatMessage>,
}

/// A user has connected to or disconnected from the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPresenceBroadcastEvent {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
/// Events that can be sent to the client
/// Events maybe related to different users and rooms, the receipient is a single chat session
pub enum Event {
    LoginSuccessful(LoginSuccessfulReplyEvent),
    Ack(AckEvent),
    RoomCreated(RoomCreatedBroadcastEvent),
    UserJoined(RoomParticipationBroadcastEvent),
    UserLeft(RoomParticipationBroadcastEvent),
    ReceiveMessage(ChatMessage),
    LoadMessages(LoadMessagesReplyEvent),
    UserConnected(UserPresenceBroadcastEvent),
    UserDisconnected(UserPresenceBroadcastEvent),
}

impl Event {
    /// The wire name of the event, used for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::LoginSuccessful(_) => "login_successful",
            Event::Ack(_) => "ack",
            Event::RoomCreated(_) => "room_created",
            Event::UserJoined(_) => "user_joined",
            Event::UserLeft(_) => "user_left",
            Event::ReceiveMessage(_) => "receive_message",
            Event::LoadMessages(_) => "load_messages",
            Event::UserConnected(_) => "user_connected",
            Event::UserDisconnected(_) => "user_disconnected",
        }
    }
}
