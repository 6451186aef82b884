//! Object storage port for listing and downloading bucket contents.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One entry returned by [`ObjectStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Object name relative to the listed prefix (e.g. `"spiral_12.png"`).
    pub name: String,
    /// Storage-assigned identifier. Folder placeholders have none.
    #[serde(default)]
    pub id: Option<String>,
    /// Size in bytes, when the service reports it.
    #[serde(default)]
    pub size: Option<u64>,
}

impl ObjectDescriptor {
    /// Whether this entry is a folder placeholder rather than a stored object.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.id.is_none()
    }
}

/// Input of a `list` call, as recorded in cassettes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequest {
    /// Bucket name.
    pub bucket: String,
    /// Path prefix to filter on.
    pub prefix: String,
}

/// Input of a `download` call, as recorded in cassettes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Bucket name.
    pub bucket: String,
    /// Full object path inside the bucket.
    pub path: String,
}

/// Downloaded object content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectBytes {
    /// Raw bytes (base64 in cassettes).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Boxed future type returned by [`ObjectStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// Lists and fetches objects from a remote bucket.
pub trait ObjectStore: Send + Sync {
    /// List objects under `prefix`. An unknown prefix yields an empty list.
    fn list<'a>(&'a self, bucket: &'a str, prefix: &'a str)
        -> StoreFuture<'a, Vec<ObjectDescriptor>>;

    /// Fetch the raw content of the object at `path`.
    fn download<'a>(&'a self, bucket: &'a str, path: &'a str) -> StoreFuture<'a, ObjectBytes>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_from_listing_json() {
        let json = r#"[
            {"name": "spiral_12.png", "id": "3f1c", "metadata": {"size": 1234}},
            {"name": "nested", "id": null, "metadata": null}
        ]"#;
        let entries: Vec<ObjectDescriptor> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].name, "spiral_12.png");
        assert!(!entries[0].is_folder());
        assert!(entries[1].is_folder());
    }

    #[test]
    fn object_bytes_are_base64_in_json() {
        let bytes = ObjectBytes { data: vec![0x89, 0x50, 0x4E, 0x47] };
        let json = serde_json::to_string(&bytes).unwrap();
        assert_eq!(json, r#"{"data":"iVBORw=="}"#);
        let back: ObjectBytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, bytes.data);
    }
}
