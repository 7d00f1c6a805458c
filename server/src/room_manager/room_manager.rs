use std::sync::Arc;

use comms::event::{self, ChatMessage, Event};
use indexmap::IndexMap;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info};

use super::{
    room::{ChatRoom, RoomJoin, SessionAndUsername, UserSessionHandle},
    RoomError,
};

const LOBBY_CHANNEL_CAPACITY: usize = 100;
const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// [RoomManager] owns every room of the server and the lobby channel
/// which reaches all connected sessions regardless of their rooms
#[derive(Debug)]
pub struct RoomManager {
    chat_rooms: RwLock<IndexMap<String, Arc<Mutex<ChatRoom>>>>,
    lobby_tx: broadcast::Sender<Event>,
    history_limit: usize,
}

impl RoomManager {
    pub(super) fn new(rooms: Vec<String>, history_limit: usize) -> RoomManager {
        let (lobby_tx, _) = broadcast::channel(LOBBY_CHANNEL_CAPACITY);

        RoomManager {
            chat_rooms: RwLock::new(
                rooms
                    .into_iter()
                    .map(|name| {
                        let room = ChatRoom::new(&name, history_limit);

                        (name, Arc::new(Mutex::new(room)))
                    })
                    .collect(),
            ),
            lobby_tx,
            history_limit,
        }
    }

    /// Names of all rooms, in creation order
    pub async fn room_names(&self) -> Vec<String> {
        self.chat_rooms.read().await.keys().cloned().collect()
    }

    /// Subscribe to events that are broadcast to every session
    pub fn subscribe_lobby(&self) -> broadcast::Receiver<Event> {
        self.lobby_tx.subscribe()
    }

    /// Broadcast an event to every session
    pub fn announce(&self, event: Event) {
        // no receivers just means nobody is connected
        let _ = self.lobby_tx.send(event);
    }

    /// Create a new room and announce it to every session
    pub async fn create_room(&self, room_name: &str) -> Result<(), RoomError> {
        if room_name.is_empty() {
            return Err(RoomError::EmptyName);
        }

        let mut chat_rooms = self.chat_rooms.write().await;

        if chat_rooms.contains_key(room_name) {
            return Err(RoomError::AlreadyExists(String::from(room_name)));
        }

        self.insert_room(&mut chat_rooms, room_name);

        Ok(())
    }

    fn insert_room(
        &self,
        chat_rooms: &mut IndexMap<String, Arc<Mutex<ChatRoom>>>,
        room_name: &str,
    ) -> Arc<Mutex<ChatRoom>> {
        let room = Arc::new(Mutex::new(ChatRoom::new(room_name, self.history_limit)));
        chat_rooms.insert(String::from(room_name), room.clone());

        info!(room = room_name, "room created");
        self.announce(Event::RoomCreated(event::RoomCreatedBroadcastEvent {
            room: String::from(room_name),
            rooms: chat_rooms.keys().cloned().collect(),
        }));

        room
    }

    /// Joins to a room given a user session, creating the room if it does not exist yet
    pub async fn join_room(
        &self,
        room_name: &str,
        session_and_username: &SessionAndUsername,
    ) -> Result<RoomJoin, RoomError> {
        if room_name.is_empty() {
            return Err(RoomError::EmptyName);
        }

        let existing = self.chat_rooms.read().await.get(room_name).cloned();
        let room = match existing {
            Some(room) => room,
            None => {
                let mut chat_rooms = self.chat_rooms.write().await;
                // another session may have created it between the two locks
                match chat_rooms.get(room_name) {
                    Some(room) => room.clone(),
                    None => self.insert_room(&mut chat_rooms, room_name),
                }
            }
        };

        let mut room = room.lock().await;
        debug!(room = room_name, username = %session_and_username.username, "user joined");

        Ok(room.join(session_and_username))
    }

    /// Stamp a message with the current local time, store it in the room history and broadcast it
    pub async fn post_message(
        &self,
        handle: &UserSessionHandle,
        message: String,
    ) -> Result<ChatMessage, RoomError> {
        let room = self.get_room(handle.room()).await?;
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

        let mut room = room.lock().await;

        Ok(room.post_message(handle, message, timestamp))
    }

    pub async fn drop_user_session_handle(&self, handle: UserSessionHandle) -> Result<(), RoomError> {
        let room = self.get_room(handle.room()).await?;

        let mut room = room.lock().await;
        debug!(room = room.name(), username = handle.username(), "user left");

        room.leave(handle);

        Ok(())
    }

    async fn get_room(&self, room_name: &str) -> Result<Arc<Mutex<ChatRoom>>, RoomError> {
        self.chat_rooms
            .read()
            .await
            .get(room_name)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(String::from(room_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::RoomManagerBuilder;
    use super::*;

    fn session(session_id: &str, username: &str) -> SessionAndUsername {
        SessionAndUsername {
            session_id: session_id.into(),
            username: username.into(),
        }
    }

    #[tokio::test]
    async fn test_seeded_rooms_are_listed_in_order() {
        let room_manager = RoomManagerBuilder::new()
            .create_room("General")
            .create_room("rust")
            .create_room("General")
            .build();

        assert_eq!(room_manager.room_names().await, vec!["General", "rust"]);
    }

    #[tokio::test]
    async fn test_create_room_announces_and_rejects_duplicates() {
        let room_manager = RoomManagerBuilder::new().create_room("General").build();
        let mut lobby_rx = room_manager.subscribe_lobby();

        assert_eq!(room_manager.create_room("rust").await, Ok(()));
        assert_eq!(
            lobby_rx.try_recv().unwrap(),
            Event::RoomCreated(event::RoomCreatedBroadcastEvent {
                room: "rust".into(),
                rooms: vec!["General".into(), "rust".into()],
            })
        );

        let err = room_manager.create_room("rust").await.unwrap_err();
        assert_eq!(err, RoomError::AlreadyExists("rust".into()));
        assert_eq!(err.to_string(), "Room already exists!");
        assert!(lobby_rx.try_recv().is_err());

        assert_eq!(room_manager.create_room("").await, Err(RoomError::EmptyName));
    }

    #[tokio::test]
    async fn test_join_creates_missing_room() {
        let room_manager = RoomManagerBuilder::new().build();

        let join = room_manager
            .join_room("random", &session("s1", "alice"))
            .await
            .unwrap();

        assert_eq!(join.user_session_handle.room(), "random");
        assert_eq!(room_manager.room_names().await, vec!["random"]);
    }

    #[tokio::test]
    async fn test_posted_messages_are_replayed_to_late_joiners() {
        let room_manager = RoomManagerBuilder::new()
            .create_room("General")
            .history_limit(10)
            .build();
        let alice = room_manager
            .join_room("General", &session("s1", "alice"))
            .await
            .unwrap();

        let posted = room_manager
            .post_message(&alice.user_session_handle, "hello".into())
            .await
            .unwrap();
        assert_eq!(posted.username, "alice");
        assert_eq!(posted.timestamp.len(), "00:00:00".len());

        let bob = room_manager
            .join_room("General", &session("s2", "bob"))
            .await
            .unwrap();
        assert_eq!(bob.history, vec![posted]);
    }
}
