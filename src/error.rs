//! Unified error type for teacounter.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use core::fmt;

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// DNS, TCP connect or socket I/O failed.
    Network,

    /// The remote call did not finish within its deadline.
    Timeout,

    /// The service answered with a non-success HTTP status.
    Status(u16),

    /// A payload could not be decoded.
    Decode,

    /// Buffer too small for the requested operation.
    BufferOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network => f.write_str("network unreachable"),
            Error::Timeout => f.write_str("timed out"),
            Error::Status(code) => write!(f, "HTTP {}", code),
            Error::Decode => f.write_str("bad response"),
            Error::BufferOverflow => f.write_str("response too large"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
