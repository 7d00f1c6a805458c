use std::{marker::PhantomData, pin::Pin};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_stream::{wrappers::LinesStream, Stream, StreamExt};

pub const NEW_LINE: &[u8; 2] = b"\r\n";

pub type BoxedStream<Item> = Pin<Box<dyn Stream<Item = Item> + Send>>;

/// Writes values of type `T` to `W` as one JSON document per line
pub struct JsonLineWriter<W, T> {
    writer: W,
    _marker: PhantomData<fn(&T)>,
}

impl<W: AsyncWrite + Unpin, T: Serialize> JsonLineWriter<W, T> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            _marker: PhantomData,
        }
    }

    pub async fn write(&mut self, value: &T) -> anyhow::Result<()> {
        let mut serialized_bytes = serde_json::to_vec(value)?;
        serialized_bytes.extend_from_slice(NEW_LINE);

        self.writer
            .write_all(serialized_bytes.as_slice())
            .await
            .context("could not write to the stream")?;
        self.writer.flush().await?;

        Ok(())
    }
}

/// Turns a reader into a stream of `T`s, one per line.
/// A line that can not be parsed is yielded as an error without ending the stream.
pub fn json_line_stream<R, T>(reader: R, peer: &'static str) -> BoxedStream<anyhow::Result<T>>
where
    R: AsyncRead + Unpin + Send + 'static,
    T: DeserializeOwned + Send + 'static,
{
    Box::pin(
        LinesStream::new(BufReader::new(reader).lines()).map(move |line| {
            line.with_context(|| format!("could not read line from the {peer}"))
                .and_then(|line| {
                    serde_json::from_str::<T>(&line)
                        .with_context(|| format!("failed to deserialize line from the {peer}"))
                })
        }),
    )
}
