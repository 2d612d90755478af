//! Room runtime: one task per room owns its session; readers watch phases.

pub mod hub;
pub mod room;

pub use hub::RoomRegistry;
pub use room::{spawn_room, Inbound, RoomHandle};
