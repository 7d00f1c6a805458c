use std::sync::Arc;

use comms::{
    command::UserCommand,
    event::{self, Event},
    transport::{self, server::CommandStream},
};
use nanoid::nanoid;
use tokio::{net::TcpStream, sync::broadcast};
use tokio_stream::StreamExt;
use tracing::{info, warn};

use crate::room_manager::RoomManager;

use self::chat_session::ChatSession;

mod chat_session;

/// Given a tcp stream and a room manager, handles the user session
/// until the user quits the session, or the tcp stream is closed for some reason, or the server shuts down
pub async fn handle_user_session(
    room_manager: Arc<RoomManager>,
    mut quit_rx: broadcast::Receiver<()>,
    stream: TcpStream,
) -> anyhow::Result<()> {
    let session_id = nanoid!();
    // Split the tcp stream into a command stream and an event writer with better ergonomics
    let (mut commands, mut event_writer) = transport::server::split_tcp_stream(stream);

    // The session is anonymous until the user tells us who they are
    let username = tokio::select! {
        username = wait_for_login(&mut commands) => match username {
            Some(username) => username,
            None => return Ok(()),
        },
        Ok(_) = quit_rx.recv() => return Ok(()),
    };

    // Create a chat session before announcing the user, so the session sees its own announcement
    // Chat Session will abstract the user session handling logic for multiple rooms
    let mut chat_session = ChatSession::new(&session_id, &username, room_manager.clone());

    // Welcoming the user with a login successful event and the rooms that exist right now
    event_writer
        .write(&Event::LoginSuccessful(event::LoginSuccessfulReplyEvent {
            username: username.clone(),
            rooms: room_manager.room_names().await,
        }))
        .await?;

    info!(%session_id, %username, "user connected");
    room_manager.announce(Event::UserConnected(event::UserPresenceBroadcastEvent {
        username: username.clone(),
    }));

    loop {
        tokio::select! {
            cmd = commands.next() => match cmd {
                // If the user closes the tcp stream, or sends a quit cmd
                // We need to cleanup resources in a way that the other users are notified about the user's departure
                None | Some(Ok(UserCommand::Quit(_))) => {
                    chat_session.leave_all_rooms().await?;
                    break;
                }
                // Handle a valid user command, its reply goes straight to the user
                Some(Ok(cmd)) => {
                    if let Some(reply) = chat_session.handle_user_command(cmd).await? {
                        event_writer.write(&reply).await?;
                    }
                }
                // A broken line is not fatal, the next one may be fine
                Some(Err(err)) => warn!(%session_id, "{:#}", err),
            },
            // Aggregated events from the chat session are sent to the user
            Ok(event) = chat_session.recv() => {
                event_writer.write(&event).await?;
            }
            // If the server is shutting down, we can just close the tcp streams
            // and exit the session handler. Since the server is shutting down,
            // we don't need to notify other users about the user's departure or cleanup resources
            Ok(_) = quit_rx.recv() => {
                drop(event_writer);
                info!(%session_id, "gracefully shutting down user tcp stream");
                return Ok(());
            }
        }
    }

    info!(%session_id, %username, "user disconnected");
    room_manager.announce(Event::UserDisconnected(event::UserPresenceBroadcastEvent {
        username,
    }));

    Ok(())
}

/// Read commands until a login with a usable username arrives.
/// Returns [None] if the stream ends or the user quits first.
async fn wait_for_login(commands: &mut CommandStream) -> Option<String> {
    while let Some(cmd) = commands.next().await {
        match cmd {
            Ok(UserCommand::Login(login)) => {
                let username = login.username.trim();

                if username.is_empty() {
                    warn!("rejected login with an empty username");
                    continue;
                }

                return Some(String::from(username));
            }
            Ok(UserCommand::Quit(_)) => return None,
            Ok(cmd) => warn!(command = cmd.name(), "command received before login, ignoring"),
            Err(err) => warn!("{:#}", err),
        }
    }

    None
}
