//! Message bridge between the widget and its host.
//!
//! The host delivers a [`Configuration`] and consumes two outbound messages:
//! frame-height requests and the committed component value.

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::types::Configuration;

/// Outbound message to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Advisory; the host resizes the embedding frame to the latest value
    SetFrameHeight { height: u32 },
    /// Committed selection, `None` when cleared
    SetComponentValue { value: Option<String> },
}

/// Bridge errors
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("failed to write host message")]
    Io(#[from] std::io::Error),

    #[error("failed to encode host message")]
    Encode(#[from] serde_json::Error),

    #[error("invalid configuration payload")]
    InvalidConfiguration(#[source] serde_json::Error),

    #[error("host bridge lock poisoned")]
    Poisoned,
}

/// Outbound side of the host bridge
pub trait HostBridge: Send + Sync {
    fn send(&self, message: HostMessage) -> Result<(), BridgeError>;
}

/// Writes one JSON object per line, flushing after each message
pub struct JsonLinesBridge<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesBridge<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, BridgeError> {
        self.writer.into_inner().map_err(|_| BridgeError::Poisoned)
    }
}

impl<W: Write + Send> HostBridge for JsonLinesBridge<W> {
    fn send(&self, message: HostMessage) -> Result<(), BridgeError> {
        let line = serde_json::to_string(&message)?;
        trace!("BRIDGE: {}", line);
        let mut writer = self.writer.lock().map_err(|_| BridgeError::Poisoned)?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps every message in memory, for embedding hosts and tests
#[derive(Default)]
pub struct RecordingBridge {
    messages: Mutex<Vec<HostMessage>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<HostMessage> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Every emitted component value, in order
    pub fn component_values(&self) -> Vec<Option<String>> {
        self.messages()
            .into_iter()
            .filter_map(|message| match message {
                HostMessage::SetComponentValue { value } => Some(value),
                HostMessage::SetFrameHeight { .. } => None,
            })
            .collect()
    }

    /// Every requested frame height, in order
    pub fn frame_heights(&self) -> Vec<u32> {
        self.messages()
            .into_iter()
            .filter_map(|message| match message {
                HostMessage::SetFrameHeight { height } => Some(height),
                HostMessage::SetComponentValue { .. } => None,
            })
            .collect()
    }
}

impl HostBridge for RecordingBridge {
    fn send(&self, message: HostMessage) -> Result<(), BridgeError> {
        self.messages
            .lock()
            .map_err(|_| BridgeError::Poisoned)?
            .push(message);
        Ok(())
    }
}

/// Drops every message
pub struct NullBridge;

impl HostBridge for NullBridge {
    fn send(&self, _message: HostMessage) -> Result<(), BridgeError> {
        Ok(())
    }
}

/// Parse an inbound argument bundle
///
/// Only malformed JSON is an error. Blank input, `null` and anything other
/// than an object mean "all defaults"; mistyped fields degrade one by one.
pub fn parse_configuration(json: &str) -> Result<Configuration, BridgeError> {
    if json.trim().is_empty() {
        return Ok(Configuration::default());
    }
    let raw: Value = serde_json::from_str(json).map_err(BridgeError::InvalidConfiguration)?;
    match raw {
        Value::Object(_) => serde_json::from_value(raw).map_err(BridgeError::InvalidConfiguration),
        Value::Null => Ok(Configuration::default()),
        other => {
            warn!("BRIDGE: Argument bundle is not an object ({}), using defaults", other);
            Ok(Configuration::default())
        }
    }
}

/// Forward host re-renders, one JSON argument bundle per line
///
/// Malformed lines are logged and skipped. Returns the number of bundles
/// forwarded once the stream ends or the receiver is gone.
pub async fn forward_configurations<R>(
    reader: R,
    tx: mpsc::UnboundedSender<Configuration>,
) -> Result<usize, BridgeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_configuration(&line) {
            Ok(config) => {
                if tx.send(config).is_err() {
                    debug!("BRIDGE: Configuration receiver closed");
                    break;
                }
                forwarded += 1;
            }
            Err(e) => warn!("BRIDGE: Skipping configuration line: {}", e),
        }
    }
    Ok(forwarded)
}
