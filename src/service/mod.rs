//! Remote counting service - what we ask it and what it answers.
//!
//! The service itself lives elsewhere; the device only knows three calls:
//!
//! | Call              | HTTP                  | Answer                 |
//! |-------------------|-----------------------|------------------------|
//! | `register(drink)` | `POST /{user}/{drink}`| `{message, success?}`  |
//! | `undo()`          | `POST /{user}/undo`   | `{message, success}`   |
//! | `stats()`         | `GET /stats/{user}`   | `{user_tea, user_coffee}` |

pub mod wire;

use core::fmt::Write;

use heapless::String;

use crate::error::{Error, Result};
use crate::input::Intent;
use crate::screen::Text;

/// Longest request path we build.
pub const PATH_CAPACITY: usize = 64;

pub type Path = String<PATH_CAPACITY>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drink {
    Tea,
    Coffee,
}

impl Drink {
    /// Name as used in URLs and on screen.
    pub fn as_str(self) -> &'static str {
        match self {
            Drink::Tea => "tea",
            Drink::Coffee => "coffee",
        }
    }
}

/// One call the dispatcher makes on behalf of the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    Register(Drink),
    Undo,
}

impl From<Intent> for Request {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Tap => Request::Register(Drink::Tea),
            Intent::DoubleTap => Request::Register(Drink::Coffee),
            Intent::LongPress => Request::Undo,
        }
    }
}

/// Answer to `register` / `undo`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reply {
    pub success: bool,
    pub message: Text,
}

/// This user's drink counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    pub tea: u32,
    pub coffee: u32,
}

/// The counting service collaborator.
///
/// Every call is a single attempt. Implementations bound their own latency
/// and report a timeout as [`Error::Timeout`].
#[allow(async_fn_in_trait)]
pub trait CountingService {
    async fn register(&mut self, drink: Drink) -> Result<Reply>;
    async fn undo(&mut self) -> Result<Reply>;
    async fn stats(&mut self) -> Result<Stats>;
}

/// Path of the `POST` for `request`.
pub fn request_path(user: &str, request: Request) -> Result<Path> {
    let action = match request {
        Request::Register(drink) => drink.as_str(),
        Request::Undo => "undo",
    };
    let mut path = Path::new();
    write!(path, "/{}/{}", user, action).map_err(|_| Error::BufferOverflow)?;
    Ok(path)
}

/// Path of the stats `GET`.
pub fn stats_path(user: &str) -> Result<Path> {
    let mut path = Path::new();
    write!(path, "/stats/{}", user).map_err(|_| Error::BufferOverflow)?;
    Ok(path)
}
