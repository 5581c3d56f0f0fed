//! Fixed names shared by the controller and the DOM layer.

use crate::preference::StorageKey;

// ── DOM ─────────────────────────────────────────────────────────

/// Class toggled on `<body>` while dark mode is active.
pub const DARK_CLASS: &str = "dark-mode";

/// Selector for checkbox controls picked up by the initial page scan.
pub const CHECKBOX_SELECTOR: &str = ".checkbox";

/// Custom event dispatched on `document` after every change.
pub const CHANGE_EVENT: &str = "darkmodechange";

/// Name of the global namespace object installed on `window`.
pub const GLOBAL_NAME: &str = "DarkMode";

/// Level for exceptions thrown by page `onChange` handlers. Must be visible
/// at the default console level.
pub const HANDLER_ERROR_LEVEL: log::Level = log::Level::Warn;

// ── Storage ─────────────────────────────────────────────────────

/// Persisted keys in read-priority order. Both are written on every persist.
pub const STORAGE_KEYS: [StorageKey; 2] = [
    StorageKey { key: "theme", dark: "dark", light: "light" },
    StorageKey { key: "dark-mode", dark: "enabled", light: "disabled" },
];
