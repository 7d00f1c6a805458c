use tokio::net::{tcp::OwnedWriteHalf, TcpStream};

use crate::{command, event};

use super::common::{json_line_stream, BoxedStream, JsonLineWriter};

/// [CommandStream] is a stream of [crate::command::UserCommand]s sent by the client
///
/// # Cancel Safety
///
/// This stream is cancel-safe, meaning that it can be used in [tokio::select!]
/// without the risk of missing commands.
pub type CommandStream = BoxedStream<anyhow::Result<command::UserCommand>>;

/// [EventWriter] writes [crate::event::Event]s to a single client
///
/// # Cancel Safety
///
/// [EventWriter::write] is not cancellation safe. If it is used as the event
/// in a [tokio::select!] statement and some other branch completes first,
/// the event may have been partially written.
pub type EventWriter = JsonLineWriter<OwnedWriteHalf, event::Event>;

/// Splits a TCP stream into a stream of commands and an event writer.
///
/// # Arguments
///
/// - `stream` - A [TcpStream] accepted from a client
pub fn split_tcp_stream(stream: TcpStream) -> (CommandStream, EventWriter) {
    let (reader, writer) = stream.into_split();

    (json_line_stream(reader, "client"), EventWriter::new(writer))
}
