/// Commands a chat session sends to the server, such as joining a room or sending a message
pub mod command;
/// Events the server pushes to a chat session, either as replies or as broadcasts
pub mod event;
/// Line delimited JSON transport of events and commands over TCP streams.
/// Requires 'server' or 'client' features to be enabled and will bring in tokio dependency alongside with other dependencies
pub mod transport;
