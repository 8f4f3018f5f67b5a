use std::collections::HashMap;
use std::sync::RwLock;

use docsync_types::Node;

use crate::error::{StoreError, StoreResult};
use crate::snapshot::BaselineSnapshot;
use crate::traits::{BaselineStore, RemoteStore};

/// In-memory remote documents, for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryRemoteStore {
    documents: RwLock<HashMap<String, String>>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish or replace the text of a document.
    pub fn insert(&self, id: impl Into<String>, text: impl Into<String>) {
        self.documents
            .write()
            .expect("lock poisoned")
            .insert(id.into(), text.into());
    }

    pub fn remove(&self, id: &str) -> Option<String> {
        self.documents.write().expect("lock poisoned").remove(id)
    }

    pub fn len(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of stored ids.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .documents
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

impl RemoteStore for InMemoryRemoteStore {
    fn fetch(&self, id: &str) -> StoreResult<String> {
        self.documents
            .read()
            .expect("lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.documents.read().expect("lock poisoned").contains_key(id))
    }
}

/// In-memory baseline snapshots.
#[derive(Debug, Default)]
pub struct InMemoryBaselineStore {
    snapshots: RwLock<HashMap<String, BaselineSnapshot>>,
}

impl InMemoryBaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BaselineStore for InMemoryBaselineStore {
    fn load(&self, id: &str) -> StoreResult<Option<BaselineSnapshot>> {
        let map = self.snapshots.read().expect("lock poisoned");
        match map.get(id) {
            Some(snapshot) => {
                snapshot.verify()?;
                Ok(Some(snapshot.clone()))
            }
            None => Ok(None),
        }
    }

    fn save(&self, id: &str, document: &Node) -> StoreResult<BaselineSnapshot> {
        let snapshot = BaselineSnapshot::new(id, document.clone())?;
        self.snapshots
            .write()
            .expect("lock poisoned")
            .insert(id.to_string(), snapshot.clone());
        Ok(snapshot)
    }

    fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(self
            .snapshots
            .write()
            .expect("lock poisoned")
            .remove(id)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn remote_fetch_and_missing() {
        let store = InMemoryRemoteStore::new();
        store.insert("b", "{}");
        store.insert("a", r#"{"x":1}"#);
        assert_eq!(store.fetch("a").unwrap(), r#"{"x":1}"#);
        assert!(store.exists("b").unwrap());
        assert_eq!(store.ids(), vec!["a", "b"]);

        let err = store.fetch("c").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref id) if id == "c"));
    }

    #[test]
    fn baseline_save_replaces_previous() {
        let store = InMemoryBaselineStore::new();
        assert!(store.load("api").unwrap().is_none());

        let first = store.save("api", &Node::from(json!({"v": 1}))).unwrap();
        let second = store.save("api", &Node::from(json!({"v": 2}))).unwrap();
        assert_ne!(first.content_hash, second.content_hash);
        assert_eq!(store.len(), 1);

        let loaded = store.load("api").unwrap().unwrap();
        assert_eq!(loaded, second);

        assert!(store.delete("api").unwrap());
        assert!(!store.delete("api").unwrap());
        assert!(store.is_empty());
    }
}
