//! Button input - edge capture, debouncing and intent classification.
//!
//! ```text
//! GPIO edge (interrupt) ──► EdgeLatch::capture ──► [PendingEdge slot]
//!                                                        │
//! main loop tick ──► Classifier::step(now, level) ◄──────┘
//!                          │
//!                          └──► Intent (Tap / DoubleTap / LongPress)
//! ```
//!
//! Only press (falling) edges come from the interrupt. Releases are seen by
//! polling the line level from the main loop, because a release only means
//! something relative to the classifier's current state.

pub mod classifier;
pub mod debounce;
pub mod latch;


pub use classifier::{Classifier, ClassifierState, Timing};
pub use debounce::DebounceFilter;
pub use latch::{EdgeLatch, PendingEdge};

/// Direction of a transition on the (active-low) button line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeDirection {
    /// High → low: button pressed.
    Falling,
    /// Low → high: button released.
    Rising,
}

/// A timestamped edge as captured in interrupt context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawEdge {
    pub direction: EdgeDirection,
    /// Milliseconds of uptime (wrapping).
    pub timestamp: u32,
}

impl RawEdge {
    pub const fn press(timestamp: u32) -> Self {
        Self {
            direction: EdgeDirection::Falling,
            timestamp,
        }
    }

    pub const fn release(timestamp: u32) -> Self {
        Self {
            direction: EdgeDirection::Rising,
            timestamp,
        }
    }
}

/// What the user meant by one complete physical interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Intent {
    Tap,
    DoubleTap,
    LongPress,
}

/// Level of the button line, polled from the main loop.
pub trait ButtonLine {
    fn is_pressed(&mut self) -> bool;
}

/// Monotonic millisecond time source. Wraps after ~49 days.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Milliseconds from `since` to `now`, tolerant of counter wrap.
#[inline]
pub(crate) fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
