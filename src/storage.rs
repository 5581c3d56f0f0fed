//! Key/value stores backing the persisted preference.
//!
//! [`LocalStore`] wraps `window.localStorage`. [`MemoryStore`] is the fallback
//! chosen when local storage is unavailable, and the store used in tests. The
//! choice is made once, when the controller is built.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::StorageError;

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

/// String-typed key/value store. Methods take `&self`; stores are shared
/// through the single-threaded controller and mutate through interior
/// mutability (or the browser).
pub trait PreferenceStore {
    /// Read `key`. `Ok(None)` means the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store refuses the read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store refuses the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory store. Never fails; contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .extend(entries.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())));
        store
    }

    /// Current value of `key`, bypassing the trait.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// `window.localStorage`. Survives reloads.
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    /// Open the page's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when there is no window, when the
    /// browser exposes no local storage, or when accessing it throws (for
    /// example in a sandboxed iframe).
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StorageError::Unavailable("localStorage is not provided".to_owned())),
            Err(err) => Err(StorageError::Unavailable(format!("{err:?}"))),
        }
    }
}

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|err| StorageError::Read { key: key.to_owned(), message: format!("{err:?}") })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StorageError::Write { key: key.to_owned(), message: format!("{err:?}") })
    }
}

/// Open [`LocalStore`], falling back to a [`MemoryStore`] when it is unavailable.
#[must_use]
pub fn open_default() -> Box<dyn PreferenceStore> {
    match LocalStore::open() {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::debug!("darkmode: {err}; preference will not survive reloads");
            Box::new(MemoryStore::new())
        }
    }
}
