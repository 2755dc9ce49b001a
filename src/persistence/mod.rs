//! Save/load persistence for the four tracker collections
//!
//! Features:
//! - One JSON document per collection (players, history, rules, seasons)
//! - Typed loading with validation; missing or corrupt data yields the default
//! - Atomic replace on save (tmp → rename)
//! - Staged multi-collection commit with crash recovery (season archive)

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageBackend;
pub use memory::MemoryBackend;

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

/// Indentation of written documents (matches the historical file format)
const INDENT: &[u8] = b"    ";

/// The independently stored collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Players,
    History,
    Rules,
    Seasons,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Players,
        Collection::History,
        Collection::Rules,
        Collection::Seasons,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Players => "players",
            Collection::History => "history",
            Collection::Rules => "rules",
            Collection::Seasons => "seasons",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Players => "players.json",
            Collection::History => "history.json",
            Collection::Rules => "rules.json",
            Collection::Seasons => "seasons.json",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failures writing to (or opening) durable storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not encode {collection}: {source}")]
    Encode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    /// Backing store cannot be reached (no LocalStorage, quota exceeded, ...)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("commit journal: {0}")]
    Journal(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> StorageError {
        let path = path.into();
        move |source| StorageError::Io { path, source }
    }
}

/// An encoded collection ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged {
    pub collection: Collection,
    pub contents: String,
}

/// Raw document storage, one document per collection
pub trait StorageBackend {
    /// Read a collection's document. `Ok(None)` when it has never been written.
    fn read(&self, collection: Collection) -> Result<Option<String>, StorageError>;

    /// Replace a collection's document
    fn write(&mut self, collection: Collection, contents: &str) -> Result<(), StorageError>;

    /// Replace several documents as one unit.
    ///
    /// The default writes them in order and offers no atomicity; backends
    /// that can do better override it.
    fn commit(&mut self, batch: &[Staged]) -> Result<(), StorageError> {
        for staged in batch {
            self.write(staged.collection, &staged.contents)?;
        }
        Ok(())
    }
}

/// A value persisted as one collection
pub trait Stored: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    /// Content checks beyond the JSON shape. A failing document is treated as corrupt.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Encode a value as pretty JSON with the on-disk indentation
pub fn encode<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Put back the previous documents of a partly written batch, newest first.
///
/// `written` pairs each written collection with its document before the
/// write (`None` if it did not exist). Returns how many could not be restored;
/// each of those is logged.
#[cfg(any(target_arch = "wasm32", test))]
pub(crate) fn roll_back<F>(written: Vec<(Collection, Option<String>)>, mut restore: F) -> usize
where
    F: FnMut(Collection, Option<&str>) -> Result<(), StorageError>,
{
    let mut failed = 0;
    for (collection, previous) in written.into_iter().rev() {
        if let Err(e) = restore(collection, previous.as_deref()) {
            log::error!("Could not roll back {}, it keeps the new contents: {}", collection, e);
            failed += 1;
        }
    }
    failed
}

/// Typed access to a storage backend
#[derive(Debug)]
pub struct Store<B> {
    backend: B,
}

impl<B: StorageBackend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Load a collection, returning `default` if it is absent, unreadable or invalid.
    ///
    /// Never fails: corrupt data is logged and replaced by the default.
    pub fn load<T: Stored>(&self, default: T) -> T {
        let collection = T::COLLECTION;
        let text = match self.backend.read(collection) {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::info!("No {} found, starting fresh", collection);
                return default;
            }
            Err(e) => {
                log::warn!("Could not read {}, using defaults: {}", collection, e);
                return default;
            }
        };

        match serde_json::from_str::<T>(&text) {
            Ok(value) => match value.validate() {
                Ok(()) => {
                    log::info!("Loaded {}", collection);
                    value
                }
                Err(reason) => {
                    log::warn!("Invalid {} ({}), using defaults", collection, reason);
                    default
                }
            },
            Err(e) => {
                log::warn!("Corrupt {} ({}), using defaults", collection, e);
                default
            }
        }
    }

    /// Encode a value without writing it
    pub fn stage<T: Stored>(&self, value: &T) -> Result<Staged, StorageError> {
        let contents = encode(value).map_err(|source| StorageError::Encode {
            collection: T::COLLECTION,
            source,
        })?;
        Ok(Staged {
            collection: T::COLLECTION,
            contents,
        })
    }

    /// Overwrite a collection with `value`
    pub fn save<T: Stored>(&mut self, value: &T) -> Result<(), StorageError> {
        let staged = self.stage(value)?;
        match self.backend.write(staged.collection, &staged.contents) {
            Ok(()) => {
                log::info!("{} saved", staged.collection);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save {}: {}", staged.collection, e);
                Err(e)
            }
        }
    }

    /// Write several staged collections as one unit
    pub fn commit(&mut self, batch: Vec<Staged>) -> Result<(), StorageError> {
        match self.backend.commit(&batch) {
            Ok(()) => {
                log::info!("Committed {} collections", batch.len());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to commit {} collections: {}", batch.len(), e);
                Err(e)
            }
        }
    }
}
