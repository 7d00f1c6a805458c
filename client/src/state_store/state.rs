use crate::session::{Document, SessionController};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerConnectionStatus {
    Uninitalized,
    Connecting,
    Connected { addr: String },
    Errored { err: String },
}

/// State holds the snapshot of the application that the UI renders
#[derive(Debug, Clone)]
pub struct State {
    pub server_connection_status: ServerConnectionStatus,
    /// Address the connect page starts out with
    pub server_addr: String,
    /// The name the user chats under, filled in once connected
    pub username: String,
    /// Rendered room list, message log, roster and prompts of the session
    pub document: Document,
    /// Timer since the connection was established
    pub timer: usize,
}

impl State {
    pub fn new(server_addr: &str, username: &str) -> Self {
        State {
            server_connection_status: ServerConnectionStatus::Uninitalized,
            server_addr: String::from(server_addr),
            username: String::from(username),
            document: Document::default(),
            timer: 0,
        }
    }

    pub fn mark_connection_request_start(&mut self, addr: &str, username: &str) {
        self.server_connection_status = ServerConnectionStatus::Connecting;
        self.server_addr = String::from(addr);
        self.username = String::from(username);
    }

    /// Processes the result of a connection request to change the state of the application
    pub fn process_connection_request_result(&mut self, result: anyhow::Result<String>) {
        self.server_connection_status = match result {
            Ok(addr) => ServerConnectionStatus::Connected { addr },
            Err(err) => ServerConnectionStatus::Errored {
                err: format!("{:#}", err),
            },
        };
        self.timer = 0;
    }

    /// The server went away, everything session related is dropped
    pub fn mark_disconnected(&mut self) {
        self.server_connection_status = ServerConnectionStatus::Errored {
            err: String::from("disconnected from the server"),
        };
        self.document = Document::default();
    }

    /// Copy what the session rendered into the snapshot
    pub fn sync_with_session(&mut self, session: &SessionController) {
        self.username = String::from(session.username());
        self.document = session.document().clone();
    }

    pub fn tick_timer(&mut self) {
        self.timer += 1;
    }
}
