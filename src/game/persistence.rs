use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::trace;

use crate::error::StoreResult;

pub trait PersistenceStore {
    /// Returns `Ok(None)` when nothing was saved under `key` yet.
    fn load(&self, key: &str) -> StoreResult<Option<String>>;
    fn save(&self, key: &str, blob: &str) -> StoreResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn contains(&self, key: &str) -> bool {
        self.blobs.borrow().contains_key(key)
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> StoreResult<()> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per blob inside `data_dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl PersistenceStore for FileStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.blob_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, blob: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.blob_path(key);
        trace!(target: "stats", "Writing {}", path.display());
        fs::write(path, blob)?;
        Ok(())
    }
}
