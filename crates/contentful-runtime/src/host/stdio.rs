//! Host bridge over newline-delimited JSON.
//!
//! The host (or a development harness standing in for it) writes one JSON
//! object per line. The first meaningful line of a live session must be
//! `{"type":"init","config":{...}}`; everything after that is host requests
//! and operator input. Replies and notifications go back the same way.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Split};
use tokio::sync::{mpsc, oneshot};

use contentful_core::config::ConfigSource;
use contentful_core::models::{ConfigUpdate, SelectedConfig};

use super::{BridgeError, ConfigUpdateCallback, HostBridge};
use crate::form::FormView;

// ── Wire messages ──────────────────────────────────────────────────

/// Lines read from the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    /// Handshake. `config` is null on a first-ever run.
    Init {
        #[serde(default)]
        config: Option<SelectedConfig>,
    },
    RequestConfigUpdate { id: u64 },
    ApiKey { value: String },
    SpaceId { value: String },
    MapName { value: String },
    PlaylistId { value: String },
    /// Ask for the current form view.
    View,
}

impl InboundMessage {
    pub fn parse(line: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(line).map_err(|e| BridgeError::Protocol(e.to_string()))
    }
}

/// Lines written to the host.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    ConfigUpdate { id: u64, config: SelectedConfig },
    ConfigUpdateAvailable,
    View { view: FormView },
}

enum Outgoing {
    Message(OutboundMessage),
    Flush(oneshot::Sender<()>),
}

// ── Reader ─────────────────────────────────────────────────────────

/// Text lines from the host. Lines that aren't valid UTF-8 are logged and
/// skipped rather than ending the stream.
pub struct HostLines<R> {
    segments: Split<R>,
}

impl<R> HostLines<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self {
            segments: reader.split(b'\n'),
        }
    }

    /// Next decodable line without its terminator, or `None` at EOF.
    pub async fn next_line(&mut self) -> Result<Option<String>, BridgeError> {
        while let Some(mut bytes) = self.segments.next_segment().await? {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            match String::from_utf8(bytes) {
                Ok(line) => return Ok(Some(line)),
                Err(e) => tracing::warn!(error = %e, "Ignoring host line that is not UTF-8"),
            }
        }
        Ok(None)
    }
}

// ── Bridge ─────────────────────────────────────────────────────────

/// A [`HostBridge`] whose host sits on the other end of a line stream.
pub struct StdioHost {
    config: Option<SelectedConfig>,
    callback: Mutex<Option<ConfigUpdateCallback>>,
    outbound: mpsc::UnboundedSender<Outgoing>,
}

impl StdioHost {
    /// Resolve the initial config and start the writer task.
    ///
    /// A live source waits for the host's `init` line; a fixture source uses
    /// its config directly and reads nothing.
    pub async fn connect<R, W>(
        source: ConfigSource,
        lines: &mut HostLines<R>,
        writer: W,
    ) -> Result<Self, BridgeError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let config = match source {
            ConfigSource::Fixture(config) => {
                tracing::info!("Using fixture config in place of a live host");
                Some(config)
            }
            ConfigSource::Live => handshake(lines).await?,
        };
        Ok(Self::with_writer(config, writer))
    }

    /// Must be called from within a tokio runtime.
    pub fn with_writer<W>(config: Option<SelectedConfig>, writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbound, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(writer, rx));
        Self {
            config,
            callback: Mutex::new(None),
            outbound,
        }
    }

    /// Answer a host `requestConfigUpdate` through the registered callback.
    pub fn answer_config_request(&self, id: u64) {
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match callback.as_ref() {
            Some(callback) => {
                let ConfigUpdate { config } = callback();
                self.send(OutboundMessage::ConfigUpdate { id, config });
            }
            None => tracing::warn!(id, "Host requested config before the form registered"),
        }
    }

    pub fn send(&self, msg: OutboundMessage) {
        if self.outbound.send(Outgoing::Message(msg)).is_err() {
            tracing::warn!("Host writer closed, dropping message");
        }
    }

    /// Wait until everything sent so far has been written.
    pub async fn flush(&self) -> Result<(), BridgeError> {
        let (done, rx) = oneshot::channel();
        self.outbound
            .send(Outgoing::Flush(done))
            .map_err(|_| BridgeError::Protocol("host writer closed".into()))?;
        rx.await
            .map_err(|_| BridgeError::Protocol("host writer closed".into()))
    }
}

impl HostBridge for StdioHost {
    fn current_config(&self) -> Option<SelectedConfig> {
        self.config.clone()
    }

    fn on_request_config_update(&self, callback: ConfigUpdateCallback) {
        *self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(callback);
    }

    fn emit_config_update_available(&self) {
        self.send(OutboundMessage::ConfigUpdateAvailable);
    }
}

async fn handshake<R>(lines: &mut HostLines<R>) -> Result<Option<SelectedConfig>, BridgeError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match InboundMessage::parse(&line) {
            Ok(InboundMessage::Init { config }) => {
                tracing::debug!(has_config = config.is_some(), "Host handshake complete");
                return Ok(config);
            }
            // Message bodies can carry the delivery token; don't log them.
            Ok(_) => tracing::warn!("Ignoring message received before host handshake"),
            Err(e) => tracing::warn!(error = %e, "Ignoring malformed line before host handshake"),
        }
    }
    Err(BridgeError::MissingHostConfig)
}

async fn write_loop<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<Outgoing>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(item) = rx.recv().await {
        match item {
            Outgoing::Message(msg) => {
                if let Err(e) = write_message(&mut writer, &msg).await {
                    tracing::error!(error = %e, "Failed to write to host");
                    break;
                }
            }
            Outgoing::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

async fn write_message<W>(writer: &mut W, msg: &OutboundMessage) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(msg).map_err(|e| BridgeError::Protocol(e.to_string()))?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
