//! Recording adapter for the `ObjectStore` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::object_store::{
    DownloadRequest, ListRequest, ObjectBytes, ObjectDescriptor, ObjectStore, StoreFuture,
};

/// Cassette port name for object store interactions.
pub const PORT: &str = "object_store";

/// Records storage interactions while delegating to an inner implementation.
pub struct RecordingObjectStore {
    inner: Box<dyn ObjectStore>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingObjectStore {
    /// Creates a new recording store wrapping the given implementation.
    pub fn new(inner: Box<dyn ObjectStore>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ObjectStore for RecordingObjectStore {
    fn list<'a>(
        &'a self,
        bucket: &'a str,
        prefix: &'a str,
    ) -> StoreFuture<'a, Vec<ObjectDescriptor>> {
        let input = ListRequest { bucket: bucket.to_string(), prefix: prefix.to_string() };
        Box::pin(async move {
            let result = self.inner.list(bucket, prefix).await;
            record_result(&self.recorder, PORT, "list", &input, &result);
            result
        })
    }

    fn download<'a>(&'a self, bucket: &'a str, path: &'a str) -> StoreFuture<'a, ObjectBytes> {
        let input = DownloadRequest { bucket: bucket.to_string(), path: path.to_string() };
        Box::pin(async move {
            let result = self.inner.download(bucket, path).await;
            record_result(&self.recorder, PORT, "download", &input, &result);
            result
        })
    }
}
