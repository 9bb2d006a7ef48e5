//! What the display should currently show.
//!
//! The main loop owns exactly one [`ScreenState`] and replaces it wholesale;
//! a [`Renderer`] turns it into pixels.

use core::fmt;

use heapless::String;

use crate::config::TEXT_CAPACITY;
use crate::service::Request;

/// Fixed-capacity text carried by screens and notifications.
pub type Text = String<TEXT_CAPACITY>;

/// Copy `s` into a [`Text`], cutting it at the last character that fits.
pub fn text(s: &str) -> Text {
    format(format_args!("{}", s))
}

/// Format into a [`Text`], dropping whatever does not fit.
pub fn format(args: fmt::Arguments<'_>) -> Text {
    let mut out = Truncating {
        text: Text::new(),
        full: false,
    };
    let _ = fmt::write(&mut out, args);
    out.text
}

struct Truncating {
    text: Text,
    full: bool,
}

impl fmt::Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full || self.text.push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenState {
    /// Start-up greeting, before the first stats arrive.
    Welcome,
    /// Idle screen with this user's drink counts.
    Home { teas: u32, coffees: u32 },
    /// A request to the counting service is in flight.
    Sending { request: Request },
    /// Outcome of a successful request. `ok` is always `true`: rejected and
    /// failed requests become [`ScreenState::ErrorMsg`].
    Result { ok: bool, text: Text },
    /// Broadcast message.
    Info { text: Text },
    /// Broadcast celebration (milestones, streaks).
    Celebration { text: Text },
    /// A request failed. Stays up until something replaces it.
    ErrorMsg { text: Text },
}

impl ScreenState {
    /// Screens that give way to `Home` after the hold time.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ScreenState::Welcome
                | ScreenState::Result { .. }
                | ScreenState::Info { .. }
                | ScreenState::Celebration { .. }
        )
    }

    pub fn is_home(&self) -> bool {
        matches!(self, ScreenState::Home { .. })
    }
}

/// Display collaborator. Fire-and-forget: drawing failures are the
/// implementation's business.
pub trait Renderer {
    fn render(&mut self, state: &ScreenState);
}
