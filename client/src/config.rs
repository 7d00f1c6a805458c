use std::path::PathBuf;

use clap::Parser;

/// Terminal client for the room chat server
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Host and port of the chat server
    #[arg(long, env = "CHAT_SERVER", default_value = "localhost:8080")]
    pub server: String,
    /// Name to chat under, can also be typed on the connect page
    #[arg(long, env = "CHAT_USERNAME", default_value = "")]
    pub username: String,
    /// Where to write logs, the terminal itself is taken by the UI
    #[arg(long, env = "CHAT_LOG_FILE", default_value = "chat-client.log")]
    pub log_file: PathBuf,
}
