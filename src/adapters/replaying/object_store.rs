//! Replaying adapter for the `ObjectStore` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::adapters::recording::object_store::PORT;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::object_store::{ObjectBytes, ObjectDescriptor, ObjectStore, StoreFuture};

/// Serves recorded storage results from a cassette.
pub struct ReplayingObjectStore {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingObjectStore {
    /// Create a replaying store backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ObjectStore for ReplayingObjectStore {
    fn list<'a>(
        &'a self,
        _bucket: &'a str,
        _prefix: &'a str,
    ) -> StoreFuture<'a, Vec<ObjectDescriptor>> {
        let output = next_output(&self.replayer, PORT, "list");
        Box::pin(async move { replay_result(output?) })
    }

    fn download<'a>(&'a self, _bucket: &'a str, _path: &'a str) -> StoreFuture<'a, ObjectBytes> {
        let output = next_output(&self.replayer, PORT, "download");
        Box::pin(async move { replay_result(output?) })
    }
}
