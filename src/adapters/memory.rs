//! In-memory object store for unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::error::{Error, ErrorKind};
use crate::ports::object_store::{ObjectBytes, ObjectDescriptor, ObjectStore, StoreFuture};

/// Objects keyed by full path, with optional scripted failures.
#[derive(Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
    failures: Mutex<HashMap<String, Vec<ErrorKind>>>,
    downloads: Mutex<Vec<String>>,
}

impl MemoryStore {
    /// Add an object at `path`.
    pub fn with(mut self, path: &str, data: Vec<u8>) -> Self {
        self.objects.insert(path.to_string(), data);
        self
    }

    /// Script failures for `path`, returned before the object is served.
    pub fn failing(self, path: &str, kinds: Vec<ErrorKind>) -> Self {
        self.failures.lock().unwrap().insert(path.to_string(), kinds);
        self
    }

    /// Every download attempt, in order.
    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

impl ObjectStore for MemoryStore {
    fn list<'a>(
        &'a self,
        _bucket: &'a str,
        prefix: &'a str,
    ) -> StoreFuture<'a, Vec<ObjectDescriptor>> {
        let folder = format!("{}/", prefix.trim_matches('/'));
        let listed = self
            .objects
            .keys()
            .filter_map(|k| k.strip_prefix(&folder))
            .map(|name| ObjectDescriptor {
                name: name.to_string(),
                id: Some(format!("id-{name}")),
                size: None,
            })
            .collect();
        Box::pin(async move { Ok(listed) })
    }

    fn download<'a>(&'a self, _bucket: &'a str, path: &'a str) -> StoreFuture<'a, ObjectBytes> {
        self.downloads.lock().unwrap().push(path.to_string());
        let scripted = self.failures.lock().unwrap().get_mut(path).and_then(|queue| {
            if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            }
        });
        let result = match scripted {
            Some(kind) => Err(Error::from_kind(kind, path)),
            None => self
                .objects
                .get(path)
                .map(|data| ObjectBytes { data: data.clone() })
                .ok_or_else(|| Error::NotFound(path.to_string())),
        };
        Box::pin(async move { result })
    }
}
