//! Reference object stores

use crate::error::{SiemError, SiemResult};
use crate::pipeline::{Sink, Source};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// An object as written by a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// In-memory store for testing
///
/// Clones share the same objects, so one store can serve as both the
/// source and the sink of a pipeline.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object
    pub async fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        let object = StoredObject {
            data: data.into(),
            content_type: "application/octet-stream".to_string(),
        };
        self.objects.write().await.insert(key.into(), object);
    }

    /// Get a stored object
    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    /// All keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Clear all objects
    pub async fn clear(&self) {
        self.objects.write().await.clear();
    }
}

#[async_trait]
impl Source for MemoryStore {
    async fn fetch(&self, key: &str) -> SiemResult<Bytes> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| SiemError::Source {
                key: key.to_string(),
                reason: "object not found".to_string(),
            })
    }
}

#[async_trait]
impl Sink for MemoryStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> SiemResult<()> {
        let object = StoredObject {
            data,
            content_type: content_type.to_string(),
        };
        self.objects.write().await.insert(key.to_string(), object);
        Ok(())
    }
}

/// Directory-backed store
///
/// Keys are relative paths below the root directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub async fn new(root: impl Into<PathBuf>) -> SiemResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        info!(path = ?root, "Initialized local store");

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a key; keys escaping the root are rejected
    fn full_path(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        (contained && !key.is_empty()).then(|| self.root.join(relative))
    }
}

#[async_trait]
impl Source for LocalStore {
    async fn fetch(&self, key: &str) -> SiemResult<Bytes> {
        let path = self.full_path(key).ok_or_else(|| SiemError::Source {
            key: key.to_string(),
            reason: "key escapes the store root".to_string(),
        })?;

        let data = fs::read(&path).await.map_err(|e| SiemError::Source {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        debug!(key = %key, path = ?path, size = data.len(), "Read object");

        Ok(Bytes::from(data))
    }
}

#[async_trait]
impl Sink for LocalStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> SiemResult<()> {
        let path = self.full_path(key).ok_or_else(|| SiemError::Sink {
            key: key.to_string(),
            reason: "key escapes the store root".to_string(),
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, &data).await?;

        debug!(
            key = %key,
            path = ?path,
            size = data.len(),
            content_type = %content_type,
            "Stored object"
        );

        Ok(())
    }
}
