//! Directory-backed stores.
//!
//! Each document lives in one file named after its id. Writes go to a
//! temporary file in the same directory and are renamed into place, so a
//! reader never sees a half-written baseline.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use docsync_types::Node;
use tracing::debug;

use crate::error::{validate_id, StoreError, StoreResult};
use crate::snapshot::BaselineSnapshot;
use crate::traits::{BaselineStore, RemoteStore};

/// Remote documents read from `<root>/<id>.<extension>`.
#[derive(Debug, Clone)]
pub struct DirRemoteStore {
    root: PathBuf,
    extension: String,
}

impl DirRemoteStore {
    /// Serve `*.json` files from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extension(root, "json")
    }

    pub fn with_extension(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds document `id`.
    pub fn path_for(&self, id: &str) -> StoreResult<PathBuf> {
        validate_id(id)?;
        Ok(self.root.join(format!("{id}.{}", self.extension)))
    }
}

impl RemoteStore for DirRemoteStore {
    fn fetch(&self, id: &str) -> StoreResult<String> {
        let path = self.path_for(id)?;
        debug!(path = %path.display(), "fetching remote document");
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(id.to_string()),
            _ => StoreError::Io(e),
        })
    }

    fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.path_for(id)?.is_file())
    }
}

/// Baseline snapshots stored as `<root>/<id>.baseline.json`.
///
/// The directory is created on first save.
#[derive(Debug, Clone)]
pub struct FsBaselineStore {
    root: PathBuf,
}

impl FsBaselineStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &str) -> StoreResult<PathBuf> {
        validate_id(id)?;
        Ok(self.root.join(format!("{id}.baseline.json")))
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> StoreResult<()> {
        fs::create_dir_all(&self.root)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl BaselineStore for FsBaselineStore {
    fn load(&self, id: &str) -> StoreResult<Option<BaselineSnapshot>> {
        let path = self.path_for(id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot: BaselineSnapshot =
            serde_json::from_str(&text).map_err(|e| StoreError::Codec(e.to_string()))?;
        snapshot.verify()?;
        debug!(id, hash = %snapshot.content_hash, "baseline loaded");
        Ok(Some(snapshot))
    }

    fn save(&self, id: &str, document: &Node) -> StoreResult<BaselineSnapshot> {
        let path = self.path_for(id)?;
        let snapshot = BaselineSnapshot::new(id, document.clone())?;
        let data =
            serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Codec(e.to_string()))?;
        self.write_atomic(&path, &data)?;
        debug!(id, hash = %snapshot.content_hash, "baseline saved");
        Ok(snapshot)
    }

    fn delete(&self, id: &str) -> StoreResult<bool> {
        match fs::remove_file(self.path_for(id)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dir_remote_reads_files_by_id() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("petstore.json"), r#"{"openapi":"3.1.0"}"#).unwrap();

        let store = DirRemoteStore::new(dir.path());
        assert_eq!(store.fetch("petstore").unwrap(), r#"{"openapi":"3.1.0"}"#);
        assert!(store.exists("petstore").unwrap());
        assert!(!store.exists("billing").unwrap());
        assert!(matches!(store.fetch("billing"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.fetch("../etc"), Err(StoreError::InvalidId { .. })));
    }

    #[test]
    fn baseline_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBaselineStore::new(dir.path().join("baselines"));
        assert!(store.load("api").unwrap().is_none());

        let doc = Node::from(json!({"info": {"description": "v1"}, "paths": {}}));
        let saved = store.save("api", &doc).unwrap();
        let loaded = store.load("api").unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.document, doc);

        assert!(store.delete("api").unwrap());
        assert!(store.load("api").unwrap().is_none());
    }

    #[test]
    fn edited_baseline_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBaselineStore::new(dir.path());
        store.save("api", &Node::from(json!({"v": 1}))).unwrap();

        let path = store.path_for("api").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replace("\"v\": 1", "\"v\": 2")).unwrap();

        assert!(matches!(store.load("api"), Err(StoreError::HashMismatch { .. })));
    }
}
