//! In-memory storage double with failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use haven_storage::{Storage, StorageBackend, StorageError, StorageResult};

type FailRule = Box<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Records every successful put. Puts whose key matches the failure rule
/// return `UploadFailed`.
pub struct MockStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
    fail_rule: Option<FailRule>,
    put_attempts: AtomicUsize,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_rule: None,
            put_attempts: AtomicUsize::new(0),
        }
    }

    pub fn failing_when<F>(rule: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            fail_rule: Some(Box::new(rule)),
            ..Self::new()
        }
    }

    pub fn failing_everything() -> Self {
        Self::failing_when(|_| true)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn put_attempts(&self) -> usize {
        self.put_attempts.load(Ordering::SeqCst)
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.put_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_rule.as_ref().is_some_and(|rule| rule(storage_key)) {
            return Err(StorageError::UploadFailed(format!(
                "injected failure for {}",
                storage_key
            )));
        }
        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, storage_key: &str) -> StorageResult<Bytes> {
        self.object(storage_key)
            .map(|o| o.data)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.objects.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(storage_key))
    }

    fn public_url(&self, storage_key: &str) -> StorageResult<String> {
        Ok(format!("memory://{}", storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
