//! Record/replay infrastructure for deterministic storage sessions.
//!
//! A cassette is a YAML file holding every [`crate::ports::ObjectStore`]
//! call made during one run. Replaying it needs neither credentials nor
//! network access.

pub mod format;
pub mod recorder;
pub mod replayer;
