//! Message transports for the MCP server.
//!
//! - [`LineTransport`]: newline-delimited JSON over any async reader/writer,
//!   with [`StdioTransport`] as its stdin/stdout instance
//! - [`ChannelTransport`]: in-process tokio mpsc channels for tests

use async_trait::async_trait;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::mpsc;

use crate::error::McpError;

/// Reads and writes whole JSON-RPC messages.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Next message, or `Ok(None)` once the peer has closed its side.
    async fn read_message(&mut self) -> Result<Option<String>, McpError>;

    /// Write one message, framing and flushing it.
    async fn write_message(&mut self, message: &str) -> Result<(), McpError>;

    async fn close(&mut self) -> Result<(), McpError>;
}

// ---------------------------------------------------------------------------
// LineTransport
// ---------------------------------------------------------------------------

/// NDJSON framing: one message per line.
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

/// The transport used when a host launches the server as a child process.
pub type StdioTransport = LineTransport<Stdin, Stdout>;

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send + Sync,
    W: AsyncWrite + Unpin + Send + Sync,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Give back the writer, e.g. to inspect what a test wrote.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl StdioTransport {
    pub fn stdio() -> Self {
        LineTransport::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send + Sync,
    W: AsyncWrite + Unpin + Send + Sync,
{
    async fn read_message(&mut self) -> Result<Option<String>, McpError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn write_message(&mut self, message: &str) -> Result<(), McpError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), McpError> {
        self.writer.flush().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ChannelTransport
// ---------------------------------------------------------------------------

/// In-process transport over a pair of mpsc channels.
pub struct ChannelTransport {
    receiver: mpsc::Receiver<String>,
    sender: mpsc::Sender<String>,
}

impl ChannelTransport {
    pub fn new(receiver: mpsc::Receiver<String>, sender: mpsc::Sender<String>) -> Self {
        Self { receiver, sender }
    }

    /// Two linked ends: what one writes, the other reads.
    pub fn pair(buffer: usize) -> (Self, Self) {
        let (tx_a, rx_a) = mpsc::channel(buffer);
        let (tx_b, rx_b) = mpsc::channel(buffer);
        (
            ChannelTransport::new(rx_a, tx_b),
            ChannelTransport::new(rx_b, tx_a),
        )
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn read_message(&mut self) -> Result<Option<String>, McpError> {
        Ok(self.receiver.recv().await)
    }

    async fn write_message(&mut self, message: &str) -> Result<(), McpError> {
        self.sender
            .send(message.to_string())
            .await
            .map_err(|e| McpError::TransportError {
                message: format!("channel send failed: {e}"),
            })
    }

    async fn close(&mut self) -> Result<(), McpError> {
        self.receiver.close();
        Ok(())
    }
}
