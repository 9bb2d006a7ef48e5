//! Tap / double-tap / long-press state machine.
//!
//! ```text
//!            press
//!   Idle ───────────► AwaitingReleaseOrLongPress
//!    ▲                  │ held ≥ long_press      │ released
//!    │                  ▼  => LongPress          ▼
//!    │            WaitForPhysicalRelease ◄── AwaitingSecondTap
//!    │                  │ released   press in window => DoubleTap
//!    ├──────────────────┘                        │
//!    └───────────────────────────────────────────┘
//!                   window elapsed => Tap
//! ```
//!
//! The long-press threshold is evaluated before a release can move the
//! machine on, so a long enough hold always wins over the start of a double
//! tap. A single tap is only reported once the double-click window has
//! passed without a second press.

use super::{elapsed, EdgeLatch, Intent};
use crate::config;

/// Classifier thresholds (ms).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub debounce_ms: u32,
    pub long_press_ms: u32,
    pub double_click_window_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            debounce_ms: config::DEBOUNCE_MS,
            long_press_ms: config::LONG_PRESS_MS,
            double_click_window_ms: config::DOUBLE_CLICK_WINDOW_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClassifierState {
    Idle,
    AwaitingReleaseOrLongPress { press_start: u32 },
    AwaitingSecondTap { release_time: u32 },
    /// An intent was already emitted; nothing more until the line is released.
    WaitForPhysicalRelease,
}

pub struct Classifier {
    state: ClassifierState,
    timing: Timing,
    /// When the classifier last saw the line go released.
    last_release: Option<u32>,
}

impl Classifier {
    pub const fn new(timing: Timing) -> Self {
        Self {
            state: ClassifierState::Idle,
            timing,
            last_release: None,
        }
    }

    pub fn state(&self) -> ClassifierState {
        self.state
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Advance the machine by one main-loop tick.
    ///
    /// `pressed` is the current line level. Press edges are pulled from
    /// `latch`; a press that cannot start or finish anything in the current
    /// state is either discarded (while the button is held) or left pending
    /// for the next interaction.
    pub fn step(&mut self, now: u32, pressed: bool, latch: &EdgeLatch) -> Option<Intent> {
        match self.state {
            ClassifierState::Idle => {
                if let Some(edge) = self.take_press(latch) {
                    debug!("press edge at {} ms, interaction starts at {} ms", edge, now);
                    self.state = ClassifierState::AwaitingReleaseOrLongPress { press_start: now };
                }
                None
            }

            ClassifierState::AwaitingReleaseOrLongPress { press_start } => {
                if pressed {
                    // The button is down: any edge now is bounce.
                    latch.take();
                    if elapsed(now, press_start) >= self.timing.long_press_ms {
                        self.state = ClassifierState::WaitForPhysicalRelease;
                        return Some(Intent::LongPress);
                    }
                } else {
                    self.last_release = Some(now);
                    self.state = ClassifierState::AwaitingSecondTap { release_time: now };
                }
                None
            }

            ClassifierState::AwaitingSecondTap { release_time } => {
                let window = self.timing.double_click_window_ms;
                match self.fresh_press(latch) {
                    Some(edge) if elapsed(edge, release_time) < window => {
                        latch.take();
                        self.state = ClassifierState::WaitForPhysicalRelease;
                        Some(Intent::DoubleTap)
                    }
                    // A press after the window starts the next interaction.
                    _ if elapsed(now, release_time) >= window => {
                        self.state = ClassifierState::Idle;
                        Some(Intent::Tap)
                    }
                    _ => None,
                }
            }

            ClassifierState::WaitForPhysicalRelease => {
                if pressed {
                    // Presses while held are physically impossible; ignore them.
                    latch.take();
                } else {
                    // A press made after the release, possibly while a
                    // dispatch blocked the loop, stays pending for Idle.
                    self.last_release = Some(now);
                    self.state = ClassifierState::Idle;
                }
                None
            }
        }
    }

    /// Pending press that is not bounce from the last release.
    fn fresh_press(&self, latch: &EdgeLatch) -> Option<u32> {
        let edge = latch.peek()?;
        if self.is_release_bounce(edge) {
            debug!("discarding release bounce at {} ms", edge);
            latch.take();
            return None;
        }
        Some(edge)
    }

    fn take_press(&self, latch: &EdgeLatch) -> Option<u32> {
        let edge = self.fresh_press(latch)?;
        latch.take();
        Some(edge)
    }

    /// Edges stamped within the debounce time of the last observed release,
    /// on either side of it, come from the contacts opening.
    fn is_release_bounce(&self, edge: u32) -> bool {
        match self.last_release {
            Some(released) => {
                let delta = edge.wrapping_sub(released) as i32;
                delta.unsigned_abs() < self.timing.debounce_ms
            }
            None => false,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}
