//! Storage

use std::{
    cell::RefCell,
    fs, io,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors from a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The record exists but does not deserialize.
    #[error("corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A durable slot holding a single serialized record.
///
/// Operations are single-shot and best-effort: there are no retries, and
/// callers decide how to degrade when one fails (the cart falls back to an
/// empty list, the session to signed-out).
pub trait Store<T> {
    /// Read the record. A slot that has never been written is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the slot cannot be read or the record
    /// does not deserialize.
    fn load(&self) -> Result<Option<T>, StoreError>;

    /// Replace the record.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record cannot be serialized or
    /// written.
    fn save(&self, value: &T) -> Result<(), StoreError>;

    /// Delete the record, leaving the slot empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the slot cannot be cleared.
    fn clear(&self) -> Result<(), StoreError>;
}

impl<T, S: Store<T> + ?Sized> Store<T> for &S {
    fn load(&self) -> Result<Option<T>, StoreError> {
        (**self).load()
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        (**self).save(value)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// One JSON document per record, addressed by file path.
///
/// The client-local analogue of a single browser storage key.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize + DeserializeOwned> Store<T> for JsonFileStore<T> {
    fn load(&self) -> Result<Option<T>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_string(value)?)?;

        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store for tests and demos.
///
/// The record round-trips through serialized JSON so it exercises the same
/// path as [`JsonFileStore`]. Interior mutability is a plain [`RefCell`]:
/// every access happens on the single UI event thread.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RefCell<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a raw record, valid or not.
    #[must_use]
    pub fn with_record(raw: impl Into<String>) -> Self {
        Self {
            record: RefCell::new(Some(raw.into())),
        }
    }

    /// The raw serialized record, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.record.borrow().clone()
    }
}

impl<T: Serialize + DeserializeOwned> Store<T> for MemoryStore {
    fn load(&self) -> Result<Option<T>, StoreError> {
        self.record
            .borrow()
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        *self.record.borrow_mut() = Some(serde_json::to_string(value)?);

        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.record.borrow_mut() = None;

        Ok(())
    }
}
