//! Wire surface: outbound commands and inbound frames.

pub mod commands;
pub mod frames;

pub use commands::{translate, ChannelSink, CommandPayload, CommandSink, GameCommand, Intent};
pub use frames::{decode_frame, ServerFrame, PROTOCOL_VERSION};
