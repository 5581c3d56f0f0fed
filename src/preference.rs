//! Resolving and persisting the dark/light preference.
//!
//! Reads walk [`STORAGE_KEYS`] in order and stop at the first key holding a
//! recognised value. Writes go to every key, each attempted independently.

use crate::consts::STORAGE_KEYS;
use crate::storage::PreferenceStore;

#[cfg(test)]
#[path = "preference_test.rs"]
mod preference_test;

/// Mapping from one storage key to its dark and light string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageKey {
    pub key: &'static str,
    pub dark: &'static str,
    pub light: &'static str,
}

impl StorageKey {
    /// The string stored under this key for `is_dark`.
    #[must_use]
    pub fn value_for(&self, is_dark: bool) -> &'static str {
        if is_dark { self.dark } else { self.light }
    }

    /// Interpret a stored value. Unrecognised values yield `None`.
    #[must_use]
    pub fn classify(&self, value: &str) -> Option<ThemePreference> {
        if value == self.dark {
            Some(ThemePreference::Dark)
        } else if value == self.light {
            Some(ThemePreference::Light)
        } else {
            None
        }
    }
}

/// Preference derived from persisted storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    Dark,
    Light,
    #[default]
    Unset,
}

impl ThemePreference {
    /// Whether the page should start dark. `Unset` starts light.
    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Resolve the stored preference. Keys that fail to read count as absent.
pub fn read_preference(store: &dyn PreferenceStore) -> ThemePreference {
    STORAGE_KEYS
        .iter()
        .find_map(|mapping| {
            let value = store.get(mapping.key).unwrap_or(None)?;
            mapping.classify(&value)
        })
        .unwrap_or_default()
}

/// Write `is_dark` under every configured key.
///
/// A failed write does not stop the remaining keys from being attempted.
/// Returns how many keys were written successfully.
pub fn persist_preference(store: &dyn PreferenceStore, is_dark: bool) -> usize {
    STORAGE_KEYS
        .iter()
        .filter(|mapping| store.set(mapping.key, mapping.value_for(is_dark)).is_ok())
        .count()
}
