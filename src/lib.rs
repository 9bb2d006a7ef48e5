//! Host-testable core of the teacounter client.
//!
//! Everything here is pure logic: button edge debouncing and intent
//! classification, the action dispatcher, the notification drain and the
//! main loop that ties them together. Hardware lives behind small traits
//! (`ButtonLine`, `Clock`, `CountingService`, `Transport`, `Renderer`)
//! implemented by the firmware binary.
//!
//! Usage: `cargo test` on the host.
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and is only built with `--features embedded`.

#![cfg_attr(not(test), no_std)]

// Must come first: the logging macros are textually scoped.
mod fmt;

pub mod app;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod notify;
pub mod screen;
pub mod service;

// Shared with the binary's display driver.
#[path = "ui/layout.rs"]
mod ui_layout_impl;

pub mod ui {
    pub mod layout {
        pub use crate::ui_layout_impl::*;
    }
}

pub use app::{App, Tick};
pub use error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
