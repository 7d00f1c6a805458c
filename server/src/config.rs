use clap::Parser;

/// Room chat server
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "CHAT_HOST", default_value = "0.0.0.0")]
    pub host: String,
    /// Port to listen on
    #[arg(long, env = "CHAT_PORT", default_value_t = 8080)]
    pub port: u16,
    /// Rooms that exist from start up, repeat the flag for more than one
    #[arg(
        long = "room",
        env = "CHAT_ROOMS",
        value_delimiter = ',',
        default_value = "General"
    )]
    pub rooms: Vec<String>,
    /// How many messages each room keeps for users joining later
    #[arg(long, env = "CHAT_HISTORY_LIMIT", default_value_t = 100)]
    pub history_limit: usize,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["server"]);

        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.rooms, vec!["General"]);
        assert_eq!(config.history_limit, 100);
    }

    #[test]
    fn test_repeated_and_delimited_rooms() {
        let config = Config::parse_from(["server", "--room", "General", "--room", "rust,ml"]);

        assert_eq!(config.rooms, vec!["General", "rust", "ml"]);
    }
}
