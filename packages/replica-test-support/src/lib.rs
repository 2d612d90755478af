//! Replica test support utilities
//!
//! Shared helpers for the replica integration tests. Only logging lives here;
//! game fixtures stay next to the tests that use them.

pub mod logging;
