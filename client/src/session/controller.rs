use std::collections::HashMap;

use comms::{
    command::{self, AckId, UserCommand},
    event::{self, ChatMessage, Event},
};
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use super::{document::Document, outbox::Outbox};

/// Room every session starts out knowing about
pub const DEFAULT_ROOM: &str = "General";

/// [SessionController] reconciles the local view of rooms with user actions and server pushes.
///
/// It owns the session state, the rendered [Document] and the [Outbox] of commands
/// that still have to reach the server. Every operation runs to completion synchronously;
/// at most one room is active at a time and the active room is always a known room.
#[derive(Debug)]
pub struct SessionController {
    username: String,
    current_room: Option<String>,
    known_rooms: IndexSet<String>,
    pending_room_creations: HashMap<AckId, String>,
    next_ack: AckId,
    outbox: Outbox,
    document: Document,
}

impl SessionController {
    /// Start a session for `username`. The login command is the first one queued.
    pub fn new(username: &str) -> Self {
        let mut controller = SessionController {
            username: String::from(username),
            current_room: None,
            known_rooms: IndexSet::from([String::from(DEFAULT_ROOM)]),
            pending_room_creations: HashMap::new(),
            next_ack: 1,
            outbox: Outbox::default(),
            document: Document::default(),
        };

        controller
            .outbox
            .emit(UserCommand::Login(command::LoginCommand {
                username: controller.username.clone(),
            }));
        controller.render_room_list();

        controller
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn current_room(&self) -> Option<&str> {
        self.current_room.as_deref()
    }

    pub fn known_rooms(&self) -> &IndexSet<String> {
        &self.known_rooms
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Commands queued since the last drain, in the order they were emitted
    pub fn drain_outbox(&mut self) -> impl Iterator<Item = UserCommand> + '_ {
        self.outbox.drain()
    }

    pub fn open_create_room_prompt(&mut self) {
        self.document.open_create_room_prompt();
    }

    pub fn cancel_create_room_prompt(&mut self) {
        self.document.dismiss_create_room_prompt();
    }

    /// Ask the server to create a room. The outcome arrives later as an ack.
    ///
    /// The prompt stays open until the server answers, and stays open on rejection
    /// so the name can be corrected.
    pub fn create_room(&mut self, name: &str) {
        let room_name = name.trim();
        // one request at a time, until the server answers
        if room_name.is_empty() || self.document.create_room_prompt.pending {
            return;
        }

        let ack = self.next_ack;
        self.next_ack += 1;
        self.pending_room_creations
            .insert(ack, String::from(room_name));

        self.outbox
            .emit(UserCommand::CreateRoom(command::CreateRoomCommand {
                ack,
                room_name: String::from(room_name),
            }));
        self.document.mark_create_room_pending(true);
    }

    /// Make `room` the active room, leaving the previous one first
    pub fn join_room(&mut self, room: &str) {
        if self.current_room.as_deref() == Some(room) {
            return;
        }

        // the server must never see this client in two rooms at once
        if let Some(previous) = self.current_room.take() {
            self.outbox
                .emit(UserCommand::LeaveRoom(command::LeaveRoomCommand { room: previous }));
        }

        self.known_rooms.insert(String::from(room));
        self.current_room = Some(String::from(room));
        self.outbox
            .emit(UserCommand::JoinRoom(command::JoinRoomCommand {
                room: String::from(room),
            }));

        self.document.show_chat(room);
        // the server replays the history of the room right after the join
        self.document.clear_messages();
        self.document.clear_roster();
        self.render_room_list();
    }

    pub fn leave_room(&mut self) {
        let Some(room) = self.current_room.take() else {
            return;
        };

        self.outbox
            .emit(UserCommand::LeaveRoom(command::LeaveRoomCommand { room }));

        self.document.show_welcome();
        self.document.clear_roster();
        self.render_room_list();
    }

    /// Send a message to the active room without waiting for delivery
    pub fn send_message(&mut self, text: &str) {
        let message = text.trim();
        let Some(room) = self.current_room.as_ref() else {
            return;
        };
        if message.is_empty() {
            return;
        }

        self.outbox
            .emit(UserCommand::SendMessage(command::SendMessageCommand {
                room: room.clone(),
                message: String::from(message),
            }));
        self.document.clear_message_input();
    }

    pub fn dismiss_alert(&mut self) {
        self.document.dismiss_alert();
    }

    pub fn handle_connected(&self, addr: &str) {
        info!(%addr, username = %self.username, "connected to server");
    }

    pub fn handle_disconnected(&self) {
        info!(username = %self.username, "disconnected from server");
    }

    pub fn handle_server_event(&mut self, event: &Event) {
        debug!(event = event.name(), "server event");

        match event {
            Event::LoginSuccessful(event) => {
                self.known_rooms.extend(event.rooms.iter().cloned());
                self.render_room_list();
            }
            Event::Ack(ack) => self.resolve_room_creation(ack),
            Event::RoomCreated(event) => {
                self.known_rooms.insert(event.room.clone());
                self.render_room_list();
            }
            Event::UserJoined(event) => {
                self.apply_participation(event, "joined");
            }
            Event::UserLeft(event) => {
                self.apply_participation(event, "left");
            }
            Event::ReceiveMessage(message) => {
                let own = self.is_own(message);
                self.document.render_message(message, own);
            }
            Event::LoadMessages(event) => self.replace_message_log(&event.messages),
            Event::UserConnected(event) => info!(username = %event.username, "user connected"),
            Event::UserDisconnected(event) => {
                info!(username = %event.username, "user disconnected")
            }
        }
    }

    fn resolve_room_creation(&mut self, ack: &event::AckEvent) {
        let Some(room_name) = self.pending_room_creations.remove(&ack.ack) else {
            warn!(ack = ack.ack, "acknowledgement for an unknown request");
            return;
        };

        if !ack.success {
            self.document.mark_create_room_pending(false);
            self.document
                .alert(ack.message.clone().unwrap_or_else(|| {
                    format!("Room \"{}\" could not be created", room_name)
                }));
            return;
        }

        self.known_rooms.insert(room_name.clone());
        self.render_room_list();
        self.document.dismiss_create_room_prompt();
        self.join_room(&room_name);
    }

    fn apply_participation(&mut self, event: &event::RoomParticipationBroadcastEvent, verb: &str) {
        if self.current_room.as_deref() != Some(event.room.as_str()) {
            return;
        }

        self.document
            .render_system_notice(format!("{} {} the room", event.username, verb));
        self.document.render_roster(&event.users);
    }

    /// Replace the whole log with the given messages, keeping their order
    fn replace_message_log(&mut self, messages: &[ChatMessage]) {
        self.document.clear_messages();

        for message in messages {
            let own = self.is_own(message);
            self.document.render_message(message, own);
        }
    }

    fn render_room_list(&mut self) {
        self.document
            .render_room_list(&self.known_rooms, self.current_room.as_deref());
    }

    fn is_own(&self, message: &ChatMessage) -> bool {
        message.username == self.username
    }
}

#[cfg(test)]
mod tests {
    use crate::session::document::{LogEntry, Panel, RoomListItem};

    use super::*;

    // a controller whose login command has already been flushed
    fn controller() -> SessionController {
        let mut controller = SessionController::new("alice");
        let _ = controller.drain_outbox().count();

        controller
    }

    fn drained(controller: &mut SessionController) -> Vec<UserCommand> {
        controller.drain_outbox().collect()
    }

    fn join(room: &str) -> UserCommand {
        UserCommand::JoinRoom(command::JoinRoomCommand { room: room.into() })
    }

    fn leave(room: &str) -> UserCommand {
        UserCommand::LeaveRoom(command::LeaveRoomCommand { room: room.into() })
    }

    fn message(username: &str, text: &str) -> ChatMessage {
        ChatMessage {
            username: username.into(),
            message: text.into(),
            timestamp: "12:00:00".into(),
        }
    }

    fn participation(room: &str, username: &str, users: &[&str]) -> event::RoomParticipationBroadcastEvent {
        event::RoomParticipationBroadcastEvent {
            room: room.into(),
            username: username.into(),
            users: users.iter().map(|u| u.to_string()).collect(),
        }
    }

    #[test]
    fn test_new_session_logs_in_and_knows_the_default_room() {
        let mut controller = SessionController::new("alice");

        assert_eq!(
            drained(&mut controller),
            vec![UserCommand::Login(command::LoginCommand {
                username: "alice".into()
            })]
        );
        assert_eq!(controller.current_room(), None);
        assert_eq!(
            controller.document().room_list,
            vec![RoomListItem {
                name: DEFAULT_ROOM.into(),
                active: false
            }]
        );
        assert_eq!(controller.document().panel, Panel::Welcome);
    }

    #[test]
    fn test_blank_room_names_and_messages_are_not_emitted() {
        let mut controller = controller();
        controller.join_room("General");
        let _ = drained(&mut controller);

        for blank in ["", " ", "\t\n  "] {
            controller.create_room(blank);
            controller.send_message(blank);
        }

        assert!(drained(&mut controller).is_empty());
        assert!(!controller.document().create_room_prompt.pending);
        assert_eq!(controller.document().message_input_generation, 0);
    }

    #[test]
    fn test_message_without_active_room_is_dropped() {
        let mut controller = controller();

        controller.send_message("hello");

        assert!(drained(&mut controller).is_empty());
        assert_eq!(controller.document().message_input_generation, 0);
    }

    #[test]
    fn test_send_message_is_trimmed_and_clears_input() {
        let mut controller = controller();
        controller.join_room("General");
        let _ = drained(&mut controller);

        controller.send_message("  hello there ");

        assert_eq!(
            drained(&mut controller),
            vec![UserCommand::SendMessage(command::SendMessageCommand {
                room: "General".into(),
                message: "hello there".into(),
            })]
        );
        assert_eq!(controller.document().message_input_generation, 1);
    }

    #[test]
    fn test_join_shows_chat_and_highlights_room() {
        let mut controller = controller();
        controller.handle_server_event(&Event::ReceiveMessage(message("bob", "stale")));

        controller.join_room("General");

        assert_eq!(drained(&mut controller), vec![join("General")]);
        assert_eq!(controller.current_room(), Some("General"));
        assert_eq!(
            controller.document().panel,
            Panel::Chat {
                room: "General".into()
            }
        );
        assert!(controller.document().messages.is_empty());
        assert_eq!(
            controller.document().room_list,
            vec![RoomListItem {
                name: "General".into(),
                active: true
            }]
        );
    }

    #[test]
    fn test_rejoining_the_active_room_changes_nothing() {
        let mut controller = controller();
        controller.join_room("General");
        controller.handle_server_event(&Event::ReceiveMessage(message("bob", "hi")));
        let _ = drained(&mut controller);
        let before = controller.document().clone();

        controller.join_room("General");

        assert!(drained(&mut controller).is_empty());
        assert_eq!(*controller.document(), before);
    }

    #[test]
    fn test_switching_rooms_leaves_before_joining() {
        let mut controller = controller();

        controller.join_room("A");
        controller.join_room("B");

        assert_eq!(
            drained(&mut controller),
            vec![join("A"), leave("A"), join("B")]
        );
        assert_eq!(controller.current_room(), Some("B"));

        let active: Vec<&str> = controller
            .document()
            .room_list
            .iter()
            .filter(|item| item.active)
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(active, vec!["B"]);
    }

    #[test]
    fn test_leave_room_returns_to_welcome_and_is_idempotent() {
        let mut controller = controller();
        controller.join_room("General");
        let _ = drained(&mut controller);

        controller.leave_room();

        assert_eq!(drained(&mut controller), vec![leave("General")]);
        assert_eq!(controller.current_room(), None);
        assert_eq!(controller.document().panel, Panel::Welcome);
        assert!(controller.document().room_list.iter().all(|item| !item.active));

        let before = controller.document().clone();
        controller.leave_room();

        assert!(drained(&mut controller).is_empty());
        assert_eq!(*controller.document(), before);
    }

    #[test]
    fn test_own_messages_are_marked() {
        let mut controller = controller();
        controller.join_room("General");

        controller.handle_server_event(&Event::ReceiveMessage(message("alice", "mine")));
        controller.handle_server_event(&Event::ReceiveMessage(message("bob", "theirs")));

        assert_eq!(
            controller.document().messages,
            vec![
                LogEntry::Message {
                    message: message("alice", "mine"),
                    own: true
                },
                LogEntry::Message {
                    message: message("bob", "theirs"),
                    own: false
                },
            ]
        );
    }

    #[test]
    fn test_history_replaces_the_log_in_order() {
        let mut controller = controller();
        controller.join_room("General");
        controller.handle_server_event(&Event::ReceiveMessage(message("carol", "old")));
        controller.handle_server_event(&Event::UserJoined(participation(
            "General",
            "carol",
            &["alice", "carol"],
        )));

        controller.handle_server_event(&Event::LoadMessages(event::LoadMessagesReplyEvent {
            messages: vec![message("a", "hi"), message("alice", "yo")],
        }));

        assert_eq!(
            controller.document().messages,
            vec![
                LogEntry::Message {
                    message: message("a", "hi"),
                    own: false
                },
                LogEntry::Message {
                    message: message("alice", "yo"),
                    own: true
                },
            ]
        );
    }

    #[test]
    fn test_participation_in_active_room_updates_notice_and_roster() {
        let mut controller = controller();
        controller.join_room("General");

        controller.handle_server_event(&Event::UserJoined(participation(
            "General",
            "bob",
            &["alice", "bob"],
        )));
        controller.handle_server_event(&Event::UserLeft(participation(
            "General",
            "bob",
            &["alice"],
        )));

        assert_eq!(
            controller.document().messages,
            vec![
                LogEntry::Notice("bob joined the room".into()),
                LogEntry::Notice("bob left the room".into()),
            ]
        );
        assert_eq!(controller.document().roster, "alice");
    }

    #[test]
    fn test_participation_in_other_rooms_is_ignored() {
        let mut controller = controller();
        controller.join_room("General");
        controller.handle_server_event(&Event::UserJoined(participation(
            "General",
            "alice",
            &["alice"],
        )));
        let before = controller.document().clone();

        controller.handle_server_event(&Event::UserJoined(participation(
            "rust",
            "bob",
            &["bob"],
        )));
        controller.handle_server_event(&Event::UserLeft(participation("rust", "bob", &[])));

        assert_eq!(*controller.document(), before);
    }

    #[test]
    fn test_participation_without_active_room_is_ignored() {
        let mut controller = controller();
        let before = controller.document().clone();

        controller.handle_server_event(&Event::UserJoined(participation(
            "General",
            "bob",
            &["bob"],
        )));

        assert_eq!(*controller.document(), before);
    }

    #[test]
    fn test_created_rooms_and_login_rooms_are_listed_once_in_order() {
        let mut controller = controller();

        controller.handle_server_event(&Event::LoginSuccessful(
            event::LoginSuccessfulReplyEvent {
                username: "alice".into(),
                rooms: vec!["General".into(), "rust".into()],
            },
        ));
        controller.handle_server_event(&Event::RoomCreated(event::RoomCreatedBroadcastEvent {
            room: "ml".into(),
            rooms: vec![],
        }));
        controller.handle_server_event(&Event::RoomCreated(event::RoomCreatedBroadcastEvent {
            room: "rust".into(),
            rooms: vec![],
        }));

        let names: Vec<&str> = controller
            .document()
            .room_list
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(names, vec!["General", "rust", "ml"]);
    }

    #[test]
    fn test_accepted_room_creation_joins_the_room() {
        let mut controller = controller();
        controller.join_room("General");
        controller.open_create_room_prompt();
        let _ = drained(&mut controller);

        controller.create_room("  rust ");

        assert_eq!(
            drained(&mut controller),
            vec![UserCommand::CreateRoom(command::CreateRoomCommand {
                ack: 1,
                room_name: "rust".into(),
            })]
        );
        assert!(controller.document().create_room_prompt.open);
        assert!(controller.document().create_room_prompt.pending);

        controller.handle_server_event(&Event::Ack(event::AckEvent {
            ack: 1,
            success: true,
            message: Some("Room \"rust\" created!".into()),
        }));

        assert_eq!(
            drained(&mut controller),
            vec![leave("General"), join("rust")]
        );
        assert_eq!(controller.current_room(), Some("rust"));
        assert!(controller.known_rooms().contains("rust"));
        assert!(!controller.document().create_room_prompt.open);
        assert_eq!(controller.document().create_room_prompt.clear_generation, 1);
        assert!(controller.document().alerts.is_empty());
    }

    #[test]
    fn test_rejected_room_creation_alerts_and_keeps_the_prompt() {
        let mut controller = controller();
        controller.open_create_room_prompt();
        controller.create_room("General");
        let _ = drained(&mut controller);
        let rooms_before = controller.known_rooms().clone();

        controller.handle_server_event(&Event::Ack(event::AckEvent {
            ack: 1,
            success: false,
            message: Some("Room already exists!".into()),
        }));

        assert!(drained(&mut controller).is_empty());
        assert_eq!(controller.current_room(), None);
        assert_eq!(*controller.known_rooms(), rooms_before);
        assert_eq!(controller.document().active_alert(), Some("Room already exists!"));
        assert!(controller.document().create_room_prompt.open);
        assert!(!controller.document().create_room_prompt.pending);
        assert_eq!(controller.document().create_room_prompt.clear_generation, 0);

        controller.dismiss_alert();
        assert_eq!(controller.document().active_alert(), None);
    }

    #[test]
    fn test_unknown_acks_are_ignored() {
        let mut controller = controller();
        let before = controller.document().clone();

        controller.handle_server_event(&Event::Ack(event::AckEvent {
            ack: 42,
            success: true,
            message: None,
        }));

        assert!(drained(&mut controller).is_empty());
        assert_eq!(*controller.document(), before);
    }

    #[test]
    fn test_switching_rooms_drops_the_old_roster() {
        let mut controller = controller();
        controller.join_room("General");
        controller.handle_server_event(&Event::UserJoined(participation(
            "General",
            "bob",
            &["alice", "bob"],
        )));
        assert_eq!(controller.document().roster, "alice, bob");

        controller.join_room("rust");

        assert_eq!(controller.document().roster, "");
    }

    #[test]
    fn test_second_creation_waits_for_the_first_answer() {
        let mut controller = controller();
        controller.open_create_room_prompt();

        controller.create_room("one");
        controller.create_room("two");

        assert_eq!(
            drained(&mut controller),
            vec![UserCommand::CreateRoom(command::CreateRoomCommand {
                ack: 1,
                room_name: "one".into(),
            })]
        );
    }

    #[test]
    fn test_each_creation_gets_its_own_ack() {
        let mut controller = controller();

        controller.create_room("one");
        controller.handle_server_event(&Event::Ack(event::AckEvent {
            ack: 1,
            success: false,
            message: Some("Room already exists!".into()),
        }));
        controller.create_room("two");

        let acks: Vec<AckId> = drained(&mut controller)
            .into_iter()
            .filter_map(|command| match command {
                UserCommand::CreateRoom(cmd) => Some(cmd.ack),
                _ => None,
            })
            .collect();
        assert_eq!(acks, vec![1, 2]);
    }
}
