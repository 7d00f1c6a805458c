use std::collections::VecDeque;

use comms::event::{self, ChatMessage, Event};
use tokio::sync::broadcast;

use super::{
    user_registry::UserRegistry, user_session_handle::UserSessionHandle, SessionAndUsername,
};

const BROADCAST_CHANNEL_CAPACITY: usize = 100;

/// What a session gets back from [ChatRoom::join]
#[derive(Debug)]
pub struct RoomJoin {
    /// Receives every event broadcast to the room from now on
    pub broadcast_rx: broadcast::Receiver<Event>,
    /// Membership proof used to post messages and to leave
    pub user_session_handle: UserSessionHandle,
    /// Messages sent to the room before the join, oldest first
    pub history: Vec<ChatMessage>,
}

#[derive(Debug)]
/// [ChatRoom] handles the participants of a chat room, its message history and the primary broadcast channel
/// A [UserSessionHandle] is handed out to a user when they join the room
pub struct ChatRoom {
    name: String,
    broadcast_tx: broadcast::Sender<Event>,
    user_registry: UserRegistry,
    history: VecDeque<ChatMessage>,
    history_limit: usize,
}

impl ChatRoom {
    pub fn new(name: &str, history_limit: usize) -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CHANNEL_CAPACITY);

        ChatRoom {
            name: String::from(name),
            broadcast_tx,
            user_registry: UserRegistry::new(),
            history: VecDeque::with_capacity(history_limit),
            history_limit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub fn roster(&self) -> Vec<String> {
        self.user_registry.roster()
    }

    /// Add a participant to the room and broadcast the new roster to all members, the joiner included
    pub fn join(&mut self, session_and_username: &SessionAndUsername) -> RoomJoin {
        let broadcast_rx = self.broadcast_tx.subscribe();
        let user_session_handle =
            UserSessionHandle::new(self.name.clone(), session_and_username.clone());

        self.user_registry.insert(&user_session_handle);

        // every join is announced, even for a second session of the same user,
        // since the joining session needs the roster to render
        let _ = self.broadcast_tx.send(Event::UserJoined(
            event::RoomParticipationBroadcastEvent {
                room: self.name.clone(),
                username: session_and_username.username.clone(),
                users: self.user_registry.roster(),
            },
        ));

        RoomJoin {
            broadcast_rx,
            user_session_handle,
            history: self.history.iter().cloned().collect(),
        }
    }

    /// Remove a participant from the room and broadcast that they left
    /// Consume the [UserSessionHandle] to drop it
    pub fn leave(&mut self, user_session_handle: UserSessionHandle) {
        if self.user_registry.remove(&user_session_handle) {
            let _ = self.broadcast_tx.send(Event::UserLeft(
                event::RoomParticipationBroadcastEvent {
                    room: self.name.clone(),
                    username: String::from(user_session_handle.username()),
                    users: self.user_registry.roster(),
                },
            ));
        }
    }

    /// Record a message in the history and broadcast it to all members
    pub fn post_message(
        &mut self,
        user_session_handle: &UserSessionHandle,
        message: String,
        timestamp: String,
    ) -> ChatMessage {
        let chat_message = ChatMessage {
            username: String::from(user_session_handle.username()),
            message,
            timestamp,
        };

        if self.history_limit > 0 {
            if self.history.len() == self.history_limit {
                self.history.pop_front();
            }
            self.history.push_back(chat_message.clone());
        }

        let _ = self
            .broadcast_tx
            .send(Event::ReceiveMessage(chat_message.clone()));

        chat_message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(session_id: &str, username: &str) -> SessionAndUsername {
        SessionAndUsername {
            session_id: session_id.into(),
            username: username.into(),
        }
    }

    #[test]
    fn test_join_broadcasts_roster_to_the_joiner() {
        let mut room = ChatRoom::new("General", 10);
        let _alice = room.join(&session("s1", "alice"));
        let mut bob = room.join(&session("s2", "bob"));

        assert_eq!(
            bob.broadcast_rx.try_recv().unwrap(),
            Event::UserJoined(event::RoomParticipationBroadcastEvent {
                room: "General".into(),
                username: "bob".into(),
                users: vec!["alice".into(), "bob".into()],
            })
        );
    }

    #[test]
    fn test_leave_broadcasts_remaining_roster() {
        let mut room = ChatRoom::new("General", 10);
        let mut alice = room.join(&session("s1", "alice"));
        let bob = room.join(&session("s2", "bob"));
        // drain the join announcements
        while alice.broadcast_rx.try_recv().is_ok() {}

        room.leave(bob.user_session_handle);

        assert_eq!(
            alice.broadcast_rx.try_recv().unwrap(),
            Event::UserLeft(event::RoomParticipationBroadcastEvent {
                room: "General".into(),
                username: "bob".into(),
                users: vec!["alice".into()],
            })
        );
        assert_eq!(room.roster(), vec!["alice"]);
    }

    #[test]
    fn test_history_is_bounded_and_replayed_on_join() {
        let mut room = ChatRoom::new("General", 2);
        let alice = room.join(&session("s1", "alice"));

        for message in ["one", "two", "three"] {
            room.post_message(&alice.user_session_handle, message.into(), "10:00:00".into());
        }

        let bob = room.join(&session("s2", "bob"));
        let replayed: Vec<&str> = bob.history.iter().map(|m| m.message.as_str()).collect();

        assert_eq!(replayed, vec!["two", "three"]);
        assert!(bob.history.iter().all(|m| m.username == "alice"));
    }
}
