//! Inbound frames from the authoritative side.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::events::GameEvent;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::snapshot_adapter::decode_snapshot_value;
use crate::errors::domain::{DomainError, ProtocolKind};

pub const PROTOCOL_VERSION: i32 = 1;

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Hello { protocol: i32 },
    Event { seq: u64, event: GameEvent },
    Snapshot { seq: u64, snapshot: GameSnapshot },
    Error { code: String, message: String },
}

impl ServerFrame {
    pub fn seq(&self) -> Option<u64> {
        match self {
            ServerFrame::Event { seq, .. } | ServerFrame::Snapshot { seq, .. } => Some(*seq),
            ServerFrame::Hello { .. } | ServerFrame::Error { .. } => None,
        }
    }
}

fn malformed(detail: impl Into<String>) -> DomainError {
    DomainError::protocol(ProtocolKind::MalformedFrame, detail)
}

/// Decode one JSON frame. Snapshot payloads go through the snapshot adapter
/// so an unrecognised phase surfaces as `UnknownPhase`.
pub fn decode_frame(json: &str) -> Result<ServerFrame, DomainError> {
    let mut value: Value =
        serde_json::from_str(json).map_err(|e| malformed(format!("Frame is not JSON: {e}")))?;

    if value.get("type").and_then(Value::as_str) == Some("snapshot") {
        let seq = value
            .get("seq")
            .and_then(Value::as_u64)
            .ok_or_else(|| malformed("Snapshot frame without seq"))?;
        let payload = value
            .get_mut("snapshot")
            .map(Value::take)
            .ok_or_else(|| malformed("Snapshot frame without snapshot"))?;
        let snapshot = decode_snapshot_value(payload)?;
        return Ok(ServerFrame::Snapshot { seq, snapshot });
    }

    serde_json::from_value(value).map_err(|e| malformed(format!("Frame decode: {e}")))
}

/// Reject a hello announcing a protocol this build does not speak.
pub fn require_protocol(frame: &ServerFrame) -> Result<(), DomainError> {
    match frame {
        ServerFrame::Hello { protocol } if *protocol != PROTOCOL_VERSION => {
            Err(DomainError::protocol(
                ProtocolKind::UnsupportedVersion,
                format!("Server speaks protocol {protocol}, expected {PROTOCOL_VERSION}"),
            ))
        }
        _ => Ok(()),
    }
}
