//! Domain-level error type used by the card model, rules and snapshot adapter.
//!
//! This type knows nothing about tasks, channels or files. The runtime layer
//! wraps it in `crate::error::AppError` through the provided `From` impl.
//!
//! Event application never produces a `DomainError`; events that do not fit
//! the current phase are recorded in the event log instead.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Input validation failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    ParseCard,
    RoomSize,
    RoundCount,
    InvalidBid,
    DuplicateCard,
    Other(String),
}

/// Failures decoding data sent by the authoritative replica
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtocolKind {
    /// Snapshot names a phase this build does not know
    UnknownPhase,
    /// Snapshot is internally inconsistent
    MalformedSnapshot,
    /// Frame could not be decoded
    MalformedFrame,
    /// Peer speaks another protocol version
    UnsupportedVersion,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid value or rule parameter
    Validation(ValidationKind, String),
    /// Protocol mismatch with the authoritative replica
    Protocol(ProtocolKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Protocol(kind, d) => write!(f, "protocol error {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }

    pub fn protocol(kind: ProtocolKind, detail: impl Into<String>) -> Self {
        Self::Protocol(kind, detail.into())
    }

    /// True when the peer must be upgraded before this replica can follow it.
    pub fn is_version_mismatch(&self) -> bool {
        matches!(
            self,
            DomainError::Protocol(ProtocolKind::UnknownPhase | ProtocolKind::UnsupportedVersion, _)
        )
    }
}
