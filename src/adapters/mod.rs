//! Adapter implementations for port traits.
//!
//! - `live/` — Real storage service and on-screen display
//! - `recording/` — Record interactions to cassettes
//! - `replaying/` — Replay interactions from cassettes

pub mod live;
pub mod recording;
pub mod replaying;

#[cfg(test)]
pub mod memory;
