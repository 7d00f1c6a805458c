use std::collections::VecDeque;

use comms::event::ChatMessage;

/// Which of the two main panels is visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// Shown while no room is active
    Welcome,
    /// Shown while chatting in `room`
    Chat { room: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomListItem {
    pub name: String,
    /// Highlighted as the active room
    pub active: bool,
}

/// A single line of the message log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Message { message: ChatMessage, own: bool },
    Notice(String),
}

/// The room creation prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRoomPrompt {
    pub open: bool,
    /// A creation request was sent and is waiting for the server
    pub pending: bool,
    /// Bumped whenever the prompt input has to be emptied
    pub clear_generation: u64,
}

/// [Document] is everything the chat page renders.
///
/// It is only ever mutated by the session controller and is cloned into
/// every state snapshot handed to the UI. The message log is append-only
/// between clears and is always shown scrolled to its newest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub room_list: Vec<RoomListItem>,
    pub panel: Panel,
    pub messages: Vec<LogEntry>,
    /// Comma separated usernames of the active room
    pub roster: String,
    pub create_room_prompt: CreateRoomPrompt,
    /// Blocking alerts, the first one is shown until dismissed
    pub alerts: VecDeque<String>,
    /// Bumped whenever the message input has to be emptied
    pub message_input_generation: u64,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            room_list: Vec::new(),
            panel: Panel::Welcome,
            messages: Vec::new(),
            roster: String::new(),
            create_room_prompt: CreateRoomPrompt::default(),
            alerts: VecDeque::new(),
            message_input_generation: 0,
        }
    }
}

impl Document {
    /// Rebuild the room list from scratch
    pub fn render_room_list<'a>(
        &mut self,
        rooms: impl IntoIterator<Item = &'a String>,
        current_room: Option<&str>,
    ) {
        self.room_list = rooms
            .into_iter()
            .map(|name| RoomListItem {
                name: name.clone(),
                active: current_room == Some(name.as_str()),
            })
            .collect();
    }

    pub fn show_chat(&mut self, room: &str) {
        self.panel = Panel::Chat {
            room: String::from(room),
        };
    }

    pub fn show_welcome(&mut self) {
        self.panel = Panel::Welcome;
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub fn render_message(&mut self, message: &ChatMessage, own: bool) {
        self.messages.push(LogEntry::Message {
            message: message.clone(),
            own,
        });
    }

    pub fn render_system_notice(&mut self, text: impl Into<String>) {
        self.messages.push(LogEntry::Notice(text.into()));
    }

    pub fn render_roster(&mut self, users: &[String]) {
        self.roster = users.join(", ");
    }

    pub fn clear_roster(&mut self) {
        self.roster.clear();
    }

    pub fn open_create_room_prompt(&mut self) {
        self.create_room_prompt.open = true;
    }

    pub fn mark_create_room_pending(&mut self, pending: bool) {
        self.create_room_prompt.pending = pending;
    }

    /// Hide the prompt and empty its input
    pub fn dismiss_create_room_prompt(&mut self) {
        self.create_room_prompt.open = false;
        self.create_room_prompt.pending = false;
        self.create_room_prompt.clear_generation += 1;
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push_back(message.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    pub fn active_alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn clear_message_input(&mut self) {
        self.message_input_generation += 1;
    }
}
