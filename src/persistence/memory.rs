//! In-process storage backend
//!
//! Keeps documents in a map. Used by tests and by front-ends that manage
//! durability themselves. Writes can be made to fail on demand.

use std::collections::HashMap;

use super::{Collection, Staged, StorageBackend, StorageError};

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    docs: HashMap<Collection, String>,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document
    pub fn with(mut self, collection: Collection, contents: impl Into<String>) -> Self {
        self.docs.insert(collection, contents.into());
        self
    }

    pub fn contents(&self, collection: Collection) -> Option<&str> {
        self.docs.get(&collection).map(String::as_str)
    }

    /// Make every following write (and commit) fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, collection: Collection) -> Result<Option<String>, StorageError> {
        Ok(self.docs.get(&collection).cloned())
    }

    fn write(&mut self, collection: Collection, contents: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.docs.insert(collection, contents.to_string());
        Ok(())
    }

    fn commit(&mut self, batch: &[Staged]) -> Result<(), StorageError> {
        self.check_writable()?;
        for staged in batch {
            self.docs.insert(staged.collection, staged.contents.clone());
        }
        Ok(())
    }
}
