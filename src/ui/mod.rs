//! User interface hardware - OLED display + the single drink button.
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×64 OLED via I²C, drawing `ScreenState`s
//! - **Button**: one tactile switch (active-low, internal pull-up). Press
//!   edges are captured at interrupt priority into the shared edge latch;
//!   the main loop polls the line level for releases.
//!
//! Text layout (`layout.rs`) is pure and lives in the library so it can be
//! tested on the host.

pub mod buttons;
pub mod display;
