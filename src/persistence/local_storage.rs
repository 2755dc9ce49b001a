//! Browser LocalStorage backend (WASM only)
//!
//! Each collection lives under its own key, e.g. `commander_tracker_players`.

use web_sys::Storage;

use super::{Collection, Staged, StorageBackend, StorageError, roll_back};

const KEY_PREFIX: &str = "commander_tracker";

pub struct LocalStorageBackend {
    storage: Storage,
}

impl LocalStorageBackend {
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self {
            storage: crate::platform::local_storage()?,
        })
    }

    fn key(collection: Collection) -> String {
        format!("{}_{}", KEY_PREFIX, collection.name())
    }

    fn set(&self, collection: Collection, contents: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(&Self::key(collection), contents)
            .map_err(|e| StorageError::Unavailable(format!("set {}: {:?}", collection, e)))
    }

    fn restore(&self, collection: Collection, previous: Option<&str>) -> Result<(), StorageError> {
        let key = Self::key(collection);
        let result = match previous {
            Some(contents) => self.storage.set_item(&key, contents),
            None => self.storage.remove_item(&key),
        };
        result.map_err(|e| StorageError::Unavailable(format!("restore {}: {:?}", collection, e)))
    }
}

impl StorageBackend for LocalStorageBackend {
    fn read(&self, collection: Collection) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(&Self::key(collection))
            .map_err(|e| StorageError::Unavailable(format!("get {}: {:?}", collection, e)))
    }

    fn write(&mut self, collection: Collection, contents: &str) -> Result<(), StorageError> {
        self.set(collection, contents)
    }

    /// Writes in order; if one fails (quota), the already written keys are put back.
    fn commit(&mut self, batch: &[Staged]) -> Result<(), StorageError> {
        let mut written: Vec<(Collection, Option<String>)> = Vec::with_capacity(batch.len());
        for staged in batch {
            let previous = self.read(staged.collection)?;
            if let Err(e) = self.set(staged.collection, &staged.contents) {
                roll_back(written, |collection, previous| self.restore(collection, previous));
                return Err(e);
            }
            written.push((staged.collection, previous));
        }
        Ok(())
    }
}
