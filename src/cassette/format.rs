//! On-disk cassette format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// A recorded session: every port interaction in call order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Interactions in the order they happened.
    pub interactions: Vec<Interaction>,
}

/// A single port call and its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Global sequence number within the cassette.
    pub seq: u64,
    /// Port name (e.g. `"object_store"`).
    pub port: String,
    /// Method name on the port (e.g. `"list"`).
    pub method: String,
    /// Serialized call arguments.
    pub input: serde_json::Value,
    /// `{"Ok": value}` or `{"Err": RecordedError}`.
    pub output: serde_json::Value,
}

/// Error payload stored under `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Concrete error variant, when the kind alone is ambiguous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Error message.
    pub message: String,
}
