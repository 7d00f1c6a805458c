use tokio::net::{tcp::OwnedWriteHalf, TcpStream};

use crate::{command, event};

use super::common::{json_line_stream, BoxedStream, JsonLineWriter};

/// [EventStream] is a stream of [crate::event::Event]s sent by the server
///
/// # Cancel Safety
///
/// This stream is cancel-safe, meaning that it can be used in [tokio::select]
/// without the risk of missing events.
pub type EventStream = BoxedStream<anyhow::Result<event::Event>>;

/// [CommandWriter] writes [crate::command::UserCommand]s to the server
///
/// # Cancel Safety
///
/// [CommandWriter::write] is not cancellation safe. If it is used as the event
/// in a [tokio::select!] statement and some other branch completes first,
/// the command may have been partially written.
pub type CommandWriter = JsonLineWriter<OwnedWriteHalf, command::UserCommand>;

/// Splits a TCP stream into a stream of events and a command writer.
///
/// # Arguments
///
/// - `stream` - A [TcpStream] connected to the server
pub fn split_tcp_stream(stream: TcpStream) -> (EventStream, CommandWriter) {
    let (reader, writer) = stream.into_split();

    (
        json_line_stream(reader, "server"),
        CommandWriter::new(writer),
    )
}
