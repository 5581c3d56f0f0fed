//! Install-time configuration for the browser layer.

use crate::consts::{CHANGE_EVENT, CHECKBOX_SELECTOR, DARK_CLASS, GLOBAL_NAME};

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// DOM names and logging options used when installing into a page.
///
/// Storage keys are deliberately absent: the persisted layout is fixed (see
/// [`crate::consts::STORAGE_KEYS`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    /// Class toggled on `<body>`.
    pub dark_class: String,
    /// Selector for controls registered during initialisation.
    pub checkbox_selector: String,
    /// Custom event type dispatched on `document`.
    pub event_name: String,
    /// Property name of the global namespace object on `window`.
    pub global_name: String,
    /// Maximum console log level.
    pub log_level: log::Level,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark_class: DARK_CLASS.to_owned(),
            checkbox_selector: CHECKBOX_SELECTOR.to_owned(),
            event_name: CHANGE_EVENT.to_owned(),
            global_name: GLOBAL_NAME.to_owned(),
            log_level: log::Level::Info,
        }
    }
}

impl ThemeConfig {
    #[must_use]
    pub fn with_log_level(mut self, level: log::Level) -> Self {
        self.log_level = level;
        self
    }
}
