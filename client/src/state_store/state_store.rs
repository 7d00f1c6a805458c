use std::time::Duration;

use anyhow::Context;
use comms::{
    command::{self, UserCommand},
    transport::{
        self,
        client::{CommandWriter, EventStream},
    },
};
use tokio::{
    net::TcpStream,
    sync::{
        broadcast,
        mpsc::{self, UnboundedReceiver, UnboundedSender},
    },
};
use tokio_stream::StreamExt;
use tracing::{info, warn};

use crate::{session::SessionController, Interrupted, Terminator};

use super::{action::Action, State};

pub struct StateStore {
    state_tx: UnboundedSender<State>,
}

impl StateStore {
    pub fn new() -> (Self, UnboundedReceiver<State>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel::<State>();

        (StateStore { state_tx }, state_rx)
    }
}

/// A live connection and the session running on top of it
struct Connection {
    event_stream: EventStream,
    command_writer: CommandWriter,
    session: SessionController,
}

impl Connection {
    async fn open(addr: &str, username: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("could not connect to {}", addr))?;
        let (event_stream, command_writer) = transport::client::split_tcp_stream(stream);

        let mut connection = Connection {
            event_stream,
            command_writer,
            session: SessionController::new(username),
        };
        connection.session.handle_connected(addr);
        // sends the login
        connection.flush().await?;

        Ok(connection)
    }

    /// Write every command the session emitted, in emission order
    async fn flush(&mut self) -> anyhow::Result<()> {
        let commands: Vec<UserCommand> = self.session.drain_outbox().collect();

        for command in commands {
            self.command_writer
                .write(&command)
                .await
                .with_context(|| format!("could not send {}", command.name()))?;
        }

        Ok(())
    }

    /// Tell the server we are leaving on purpose
    async fn quit(&mut self) {
        if let Err(err) = self
            .command_writer
            .write(&UserCommand::Quit(command::QuitCommand))
            .await
        {
            warn!("could not send quit: {:#}", err);
        }
    }
}

/// Apply a UI action to the session, connection level actions are left to the loop
fn dispatch(session: &mut SessionController, action: Action) {
    match action {
        Action::OpenCreateRoomPrompt => session.open_create_room_prompt(),
        Action::CancelCreateRoomPrompt => session.cancel_create_room_prompt(),
        Action::CreateRoom { name } => session.create_room(&name),
        Action::SelectRoom { room } => session.join_room(&room),
        Action::LeaveRoom => session.leave_room(),
        Action::SendMessage { content } => session.send_message(&content),
        Action::DismissAlert => session.dismiss_alert(),
        Action::ConnectToServerRequest { .. } | Action::Exit => {}
    }
}

impl StateStore {
    pub async fn main_loop(
        self,
        mut terminator: Terminator,
        mut state: State,
        mut action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut opt_connection: Option<Connection> = None;

        // the initial state once
        self.state_tx.send(state.clone())?;

        let mut ticker = tokio::time::interval(Duration::from_secs(1));

        let result = loop {
            if let Some(connection) = opt_connection.as_mut() {
                let mut disconnected = false;

                tokio::select! {
                    // Handle the server events as they come in
                    maybe_event = connection.event_stream.next() => match maybe_event {
                        Some(Ok(event)) => connection.session.handle_server_event(&event),
                        Some(Err(err)) => warn!("dropping unreadable event: {:#}", err),
                        // server disconnected, we need to reset the state
                        None => disconnected = true,
                    },
                    // Handle the actions coming from the UI
                    Some(action) = action_rx.recv() => match action {
                        Action::Exit => {
                            connection.quit().await;
                            let _ = terminator.terminate(Interrupted::UserInt);

                            break Interrupted::UserInt;
                        },
                        action => {
                            dispatch(&mut connection.session, action);
                        }
                    },
                    // Tick to terminate the select every N milliseconds
                    _ = ticker.tick() => {
                        state.tick_timer();
                    },
                    // Catch and handle interrupt signal to gracefully shutdown
                    Ok(interrupted) = interrupt_rx.recv() => {
                        connection.quit().await;

                        break interrupted;
                    }
                }

                if !disconnected {
                    if let Err(err) = connection.flush().await {
                        warn!("{:#}", err);
                        disconnected = true;
                    }
                }

                if disconnected {
                    connection.session.handle_disconnected();
                    opt_connection = None;
                    state.mark_disconnected();
                } else {
                    state.sync_with_session(&connection.session);
                }
            } else {
                tokio::select! {
                    Some(action) = action_rx.recv() => match action {
                        Action::ConnectToServerRequest { addr, username } => {
                            let username = username.trim().to_string();
                            state.mark_connection_request_start(&addr, &username);
                            // emit event to re-render any part depending on the connection status
                            self.state_tx.send(state.clone())?;

                            match Connection::open(&addr, &username).await {
                                Ok(connection) => {
                                    state.sync_with_session(&connection.session);
                                    // set the connection and change status for further processing
                                    let _ = opt_connection.insert(connection);
                                    state.process_connection_request_result(Ok(addr));
                                    // ticker needs to be resetted to avoid showing time spent inputting and connecting to the server address
                                    ticker.reset();
                                },
                                Err(err) => {
                                    warn!("{:#}", err);
                                    state.process_connection_request_result(Err(err));
                                }
                            }
                        },
                        Action::Exit => {
                            let _ = terminator.terminate(Interrupted::UserInt);

                            break Interrupted::UserInt;
                        },
                        _ => (),
                    },
                    // Catch and handle interrupt signal to gracefully shutdown
                    Ok(interrupted) = interrupt_rx.recv() => {
                        break interrupted;
                    }
                }
            }

            self.state_tx.send(state.clone())?;
        };

        info!(reason = ?result, "state store stopped");

        Ok(result)
    }
}
