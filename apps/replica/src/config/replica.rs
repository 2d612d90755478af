use std::env;
use std::str::FromStr;

use crate::error::AppError;

pub const ROOM_BUFFER_VAR: &str = "REPLICA_ROOM_BUFFER";
pub const MAX_ROOMS_VAR: &str = "REPLICA_MAX_ROOMS";

const DEFAULT_ROOM_BUFFER: usize = 256;
const DEFAULT_MAX_ROOMS: usize = 1024;

/// Runtime knobs for the room registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaConfig {
    /// Capacity of each room's inbound frame channel
    pub room_buffer: usize,
    /// Maximum number of rooms hosted at once
    pub max_rooms: usize,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            room_buffer: DEFAULT_ROOM_BUFFER,
            max_rooms: DEFAULT_MAX_ROOMS,
        }
    }
}

impl ReplicaConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset variables fall back to
    /// defaults; set but unparsable or zero values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            room_buffer: positive_var(&lookup, ROOM_BUFFER_VAR, DEFAULT_ROOM_BUFFER)?,
            max_rooms: positive_var(&lookup, MAX_ROOMS_VAR, DEFAULT_MAX_ROOMS)?,
        })
    }
}

fn positive_var<F>(lookup: &F, name: &str, default: usize) -> Result<usize, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    let value = usize::from_str(raw.trim()).map_err(|_| {
        AppError::config(format!(
            "Environment variable '{name}' must be a positive integer, got '{raw}'"
        ))
    })?;
    if value == 0 {
        return Err(AppError::config(format!(
            "Environment variable '{name}' must be greater than zero"
        )));
    }
    Ok(value)
}
