//! Dark/light theme toggle for a web page, compiled to WebAssembly.
//!
//! One boolean ("is dark mode active") is kept consistent across the
//! `dark-mode` class on `<body>`, every registered checkbox, two persisted
//! `localStorage` keys, and subscribers to the `darkmodechange` event. The
//! core ([`controller`], [`preference`], [`storage`]) is browser-independent
//! and tested on the host; [`dom`] and [`bindings`] adapt it to `web_sys`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | [`controller::ThemeCore`] state and the shared [`controller::ThemeController`] handle |
//! | [`preference`] | Resolving and persisting the stored preference |
//! | [`storage`] | Key/value store trait, `localStorage` and in-memory stores |
//! | [`surface`] | Traits for the body marker, controls, and deferred work |
//! | [`dom`] | `web_sys` implementations of [`surface`] and event dispatch |
//! | [`bindings`] | Wasm start function and the `window.DarkMode` global |
//! | [`config`] | Install-time DOM names and log level |
//! | [`consts`] | Fixed class, selector, event and storage key names |
//! | [`error`] | Storage error type |

pub mod bindings;
pub mod config;
pub mod consts;
pub mod controller;
pub mod dom;
pub mod error;
pub mod preference;
pub mod storage;
pub mod surface;

pub use config::ThemeConfig;
pub use controller::{ApplyOptions, ThemeChange, ThemeController};
pub use preference::ThemePreference;
