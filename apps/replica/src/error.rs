use thiserror::Error;

use crate::domain::ids::RoomId;
use crate::errors::domain::{DomainError, ProtocolKind, ValidationKind};
use crate::errors::ErrorCode;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Room not found: {room_id}")]
    RoomNotFound { room_id: RoomId },
    #[error("Room already open: {room_id}")]
    RoomAlreadyOpen { room_id: RoomId },
    #[error("Room capacity reached: {limit} rooms")]
    RoomCapacity { limit: usize },
    #[error("Room closed: {room_id}")]
    RoomClosed { room_id: RoomId },
    #[error("Transport error: {detail}")]
    Transport { detail: String },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation(ValidationKind::ParseCard, _) => ErrorCode::ParseCard,
                DomainError::Validation(
                    ValidationKind::RoomSize | ValidationKind::RoundCount,
                    _,
                ) => ErrorCode::InvalidRule,
                DomainError::Validation(ValidationKind::InvalidBid, _) => ErrorCode::InvalidBid,
                DomainError::Validation(_, _) => ErrorCode::ValidationError,
                DomainError::Protocol(ProtocolKind::UnknownPhase, _) => ErrorCode::UnknownPhase,
                DomainError::Protocol(ProtocolKind::MalformedSnapshot, _) => {
                    ErrorCode::MalformedSnapshot
                }
                DomainError::Protocol(ProtocolKind::MalformedFrame, _) => ErrorCode::MalformedFrame,
                DomainError::Protocol(ProtocolKind::UnsupportedVersion, _) => {
                    ErrorCode::UnsupportedVersion
                }
            },
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::RoomNotFound { .. } => ErrorCode::RoomNotFound,
            AppError::RoomAlreadyOpen { .. } => ErrorCode::RoomAlreadyOpen,
            AppError::RoomCapacity { .. } => ErrorCode::RoomCapacity,
            AppError::RoomClosed { .. } => ErrorCode::RoomClosed,
            AppError::Transport { .. } => ErrorCode::TransportError,
            AppError::Decode(_) => ErrorCode::MalformedFrame,
            AppError::Io(_) => ErrorCode::IoError,
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }
}
