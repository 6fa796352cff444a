//! Coaxx Storage - durable key-value slots.
//!
//! The cart and the admin catalog draft each live in a single named slot
//! holding a JSON document. This crate provides the slot abstraction and two
//! backends:
//!
//! - [`MemoryStore`] - in-process map, optionally with a byte quota (tests,
//!   ephemeral sessions)
//! - [`FileStore`] - one file per key under a root directory
//!
//! All operations are synchronous. A store is owned by exactly one consumer;
//! there is no cross-process locking and the last writer wins.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Check that `key` can name a slot in every backend.
///
/// Keys are non-empty, do not start with a dot, and use only
/// `[A-Za-z0-9._-]`.
///
/// # Errors
///
/// Returns `StorageError::InvalidKey` otherwise.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if key.is_empty() || key.starts_with('.') || !valid_chars {
        return Err(StorageError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

/// A synchronous string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write is rejected (quota, I/O, bad key).
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// List stored keys in sorted order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}
