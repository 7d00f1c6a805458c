use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use comms::{
    command::UserCommand,
    event::{self, Event},
};
use tokio::{
    sync::{broadcast, mpsc},
    task::{AbortHandle, JoinSet},
};
use tracing::{debug, warn};

use crate::room_manager::{RoomError, RoomManager, SessionAndUsername, UserSessionHandle};

const SESSION_CHANNEL_CAPACITY: usize = 100;

pub(super) struct ChatSession {
    session_and_username: SessionAndUsername,
    room_manager: Arc<RoomManager>,
    joined_rooms: HashMap<String, (UserSessionHandle, AbortHandle)>,
    join_set: JoinSet<()>,
    mpsc_tx: mpsc::Sender<Event>,
    mpsc_rx: mpsc::Receiver<Event>,
}

impl ChatSession {
    pub fn new(session_id: &str, username: &str, room_manager: Arc<RoomManager>) -> Self {
        let (mpsc_tx, mpsc_rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
        let session_and_username = SessionAndUsername {
            session_id: String::from(session_id),
            username: String::from(username),
        };

        let mut chat_session = ChatSession {
            session_and_username,
            room_manager,
            joined_rooms: HashMap::new(),
            join_set: JoinSet::new(),
            mpsc_tx,
            mpsc_rx,
        };

        // lobby events reach every session, independent of the joined rooms
        let lobby_rx = chat_session.room_manager.subscribe_lobby();
        chat_session.forward(lobby_rx);

        chat_session
    }

    /// Spawn a task forwarding a broadcast channel into the session's mpsc channel
    /// hence the user can receive events from different sources via a single channel
    fn forward(&mut self, mut broadcast_rx: broadcast::Receiver<Event>) -> AbortHandle {
        let mpsc_tx = self.mpsc_tx.clone();

        self.join_set.spawn(async move {
            loop {
                match broadcast_rx.recv().await {
                    Ok(event) => {
                        if mpsc_tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session fell behind, dropped events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Handle a user command related to room management such as; create, join, leave, send message.
    ///
    /// Returns the reply meant only for this session. The caller writes it to the user
    /// before draining [ChatSession::recv] again, since this task is the only reader
    /// of the session channel.
    pub async fn handle_user_command(&mut self, cmd: UserCommand) -> anyhow::Result<Option<Event>> {
        debug!(command = cmd.name(), username = %self.session_and_username.username, "handling command");

        match cmd {
            UserCommand::CreateRoom(cmd) => {
                let room_name = cmd.room_name.trim();

                let ack = match self.room_manager.create_room(room_name).await {
                    Ok(()) => event::AckEvent {
                        ack: cmd.ack,
                        success: true,
                        message: Some(format!("Room \"{}\" created!", room_name)),
                    },
                    // nothing to create, the request is dropped without an answer
                    Err(RoomError::EmptyName) => return Ok(None),
                    Err(err) => event::AckEvent {
                        ack: cmd.ack,
                        success: false,
                        message: Some(err.to_string()),
                    },
                };

                return Ok(Some(Event::Ack(ack)));
            }
            UserCommand::JoinRoom(cmd) => {
                if self.joined_rooms.contains_key(&cmd.room) {
                    warn!("{}", RoomError::AlreadyJoined(cmd.room));
                    return Ok(None);
                }

                let join = match self
                    .room_manager
                    .join_room(&cmd.room, &self.session_and_username)
                    .await
                {
                    Ok(join) => join,
                    Err(err) => {
                        warn!(%err, "could not join room");
                        return Ok(None);
                    }
                };

                let abort_handle = self.forward(join.broadcast_rx);

                // store references to the user session handle and abort handle
                // this is used to send messages to the room and to cancel the task when user leaves the room
                self.joined_rooms
                    .insert(cmd.room, (join.user_session_handle, abort_handle));

                // the history is written before anything forwarded from the room,
                // so the join announcement is rendered after the replayed messages
                return Ok(Some(Event::LoadMessages(event::LoadMessagesReplyEvent {
                    messages: join.history,
                })));
            }
            UserCommand::SendMessage(cmd) => {
                if cmd.message.is_empty() {
                    return Ok(None);
                }

                if let Some((user_session_handle, _)) = self.joined_rooms.get(&cmd.room) {
                    if let Err(err) = self
                        .room_manager
                        .post_message(user_session_handle, cmd.message)
                        .await
                    {
                        warn!(%err, "could not post message");
                    }
                }
            }
            UserCommand::LeaveRoom(cmd) => {
                // remove the room from joined rooms and drop user session handle for the room
                if let Some(urp) = self.joined_rooms.remove(&cmd.room) {
                    self.cleanup_room(urp).await?;
                }
            }
            UserCommand::Login(_) | UserCommand::Quit(_) => {}
        }

        Ok(None)
    }

    /// Leave all the rooms the user is currently participating in
    pub async fn leave_all_rooms(&mut self) -> anyhow::Result<()> {
        // drain the joined rooms to a variable, necessary to avoid borrowing self
        let drained = self.joined_rooms.drain().collect::<Vec<_>>();

        for (_, urp) in drained {
            self.cleanup_room(urp).await?;
        }

        Ok(())
    }

    /// Cleanup the room by removing the user from the room and
    /// aborting the task that forwards broadcasted messages to the user
    async fn cleanup_room(
        &mut self,
        (user_session_handle, abort_handle): (UserSessionHandle, AbortHandle),
    ) -> anyhow::Result<()> {
        abort_handle.abort();

        self.room_manager
            .drop_user_session_handle(user_session_handle)
            .await?;

        Ok(())
    }

    /// Recieve an event that may have originated from any of the rooms the user is actively participating in
    pub async fn recv(&mut self) -> anyhow::Result<Event> {
        self.mpsc_rx
            .recv()
            .await
            .context("could not recv from the session channel")
    }
}
