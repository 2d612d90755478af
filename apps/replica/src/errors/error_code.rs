//! Error codes for the replica runtime.
//!
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings written to
//! logs and CLI output. Add new codes here; never pass ad-hoc strings.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation
    /// Card id could not be parsed
    ParseCard,
    /// Room size or round count out of range
    InvalidRule,
    /// Bid outside the legal range
    InvalidBid,
    /// General validation error
    ValidationError,

    // Protocol
    /// Snapshot names an unknown phase
    UnknownPhase,
    /// Snapshot is inconsistent
    MalformedSnapshot,
    /// Frame could not be decoded
    MalformedFrame,
    /// Peer protocol version differs
    UnsupportedVersion,

    // Runtime
    /// No room with that id is open
    RoomNotFound,
    /// A room with that id is already open
    RoomAlreadyOpen,
    /// Registry is at capacity
    RoomCapacity,
    /// Room task has stopped
    RoomClosed,
    /// Outbound command could not be delivered
    TransportError,
    /// Invalid configuration
    ConfigError,
    /// Filesystem or stdio failure
    IoError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseCard => "PARSE_CARD",
            Self::InvalidRule => "INVALID_RULE",
            Self::InvalidBid => "INVALID_BID",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UnknownPhase => "UNKNOWN_PHASE",
            Self::MalformedSnapshot => "MALFORMED_SNAPSHOT",
            Self::MalformedFrame => "MALFORMED_FRAME",
            Self::UnsupportedVersion => "UNSUPPORTED_VERSION",
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::RoomAlreadyOpen => "ROOM_ALREADY_OPEN",
            Self::RoomCapacity => "ROOM_CAPACITY",
            Self::RoomClosed => "ROOM_CLOSED",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }

    pub const ALL: [ErrorCode; 15] = [
        Self::ParseCard,
        Self::InvalidRule,
        Self::InvalidBid,
        Self::ValidationError,
        Self::UnknownPhase,
        Self::MalformedSnapshot,
        Self::MalformedFrame,
        Self::UnsupportedVersion,
        Self::RoomNotFound,
        Self::RoomAlreadyOpen,
        Self::RoomCapacity,
        Self::RoomClosed,
        Self::TransportError,
        Self::ConfigError,
        Self::IoError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
