//! File-per-collection storage in a data directory
//!
//! Layout inside the directory:
//! - `players.json`, `history.json`, `rules.json`, `seasons.json`
//! - `<file>.tmp` while a single collection is being replaced
//! - `<file>.pending` + `commit.journal` while a multi-collection commit is in flight
//!
//! A commit stages every document as `.pending`, publishes the journal
//! (itself via tmp → rename), renames each pending file into place and then
//! removes the journal. Opening the directory finishes a commit whose journal
//! exists and discards staged files whose journal never got published.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{Collection, Staged, StorageBackend, StorageError};

const JOURNAL: &str = "commit.journal";

#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) a data directory and recover any interrupted commit
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(StorageError::io(&dir))?;
        let backend = Self { dir };
        backend.recover()?;
        Ok(backend)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    fn tmp_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.tmp", collection.file_name()))
    }

    fn pending_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.pending", collection.file_name()))
    }

    fn journal_path(&self) -> PathBuf {
        self.dir.join(JOURNAL)
    }

    fn journal_tmp_path(&self) -> PathBuf {
        self.dir.join(format!("{}.tmp", JOURNAL))
    }

    fn recover(&self) -> Result<(), StorageError> {
        let journal = self.journal_path();
        match fs::read_to_string(&journal) {
            Ok(text) => {
                match serde_json::from_str::<Vec<Collection>>(&text) {
                    Ok(staged) => {
                        log::warn!("Completing interrupted commit of {} collections", staged.len());
                        self.roll_forward(&staged)?;
                    }
                    Err(e) => {
                        log::warn!("Discarding unreadable commit journal: {}", e);
                        self.discard_staged()?;
                    }
                }
                fs::remove_file(&journal).map_err(StorageError::io(&journal))?;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.discard_staged(),
            Err(e) => Err(StorageError::io(&journal)(e)),
        }
    }

    fn roll_forward(&self, staged: &[Collection]) -> Result<(), StorageError> {
        for &collection in staged {
            let pending = self.pending_path(collection);
            if pending.exists() {
                let target = self.path(collection);
                fs::rename(&pending, &target).map_err(StorageError::io(&target))?;
            }
        }
        Ok(())
    }

    fn discard_staged(&self) -> Result<(), StorageError> {
        let leftovers = Collection::ALL
            .into_iter()
            .flat_map(|c| [self.pending_path(c), self.tmp_path(c)])
            .chain([self.journal_tmp_path()]);
        for path in leftovers {
            match fs::remove_file(&path) {
                Ok(()) => log::warn!("Discarded incomplete write {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::io(&path)(e)),
            }
        }
        Ok(())
    }
}

/// Write a file and flush it to disk before returning
fn write_synced(path: &Path, contents: &str) -> Result<(), StorageError> {
    let mut file = File::create(path).map_err(StorageError::io(path))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(StorageError::io(path))
}

impl StorageBackend for FileBackend {
    fn read(&self, collection: Collection) -> Result<Option<String>, StorageError> {
        let path = self.path(collection);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path)(e)),
        }
    }

    fn write(&mut self, collection: Collection, contents: &str) -> Result<(), StorageError> {
        let tmp = self.tmp_path(collection);
        let target = self.path(collection);
        write_synced(&tmp, contents)?;
        fs::rename(&tmp, &target).map_err(StorageError::io(&target))
    }

    fn commit(&mut self, batch: &[Staged]) -> Result<(), StorageError> {
        for staged in batch {
            write_synced(&self.pending_path(staged.collection), &staged.contents)?;
        }

        let names: Vec<Collection> = batch.iter().map(|s| s.collection).collect();
        let journal_text =
            serde_json::to_string(&names).map_err(|e| StorageError::Journal(e.to_string()))?;
        let journal = self.journal_path();
        let journal_tmp = self.journal_tmp_path();
        write_synced(&journal_tmp, &journal_text)?;
        fs::rename(&journal_tmp, &journal).map_err(StorageError::io(&journal))?;

        self.roll_forward(&names)?;
        fs::remove_file(&journal).map_err(StorageError::io(&journal))
    }
}
