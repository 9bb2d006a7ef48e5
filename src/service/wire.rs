//! JSON bodies returned by the counting service.

use heapless::String;
use serde::Deserialize;

use super::{Reply, Stats};
use crate::config::RAW_NOTIFICATION_CAPACITY;
use crate::error::{Error, Result};
use crate::screen;

/// Scratch space for unescaping strings (the server escapes non-ASCII).
const UNESCAPE_BUFFER_SIZE: usize = RAW_NOTIFICATION_CAPACITY;

#[derive(Deserialize)]
struct ReplyBody {
    /// Register replies carry no `success`; reaching the server is success.
    #[serde(default)]
    success: Option<bool>,
    message: String<UNESCAPE_BUFFER_SIZE>,
}

#[derive(Deserialize)]
struct StatsBody {
    #[serde(alias = "user_tea")]
    tea: u32,
    #[serde(alias = "user_coffee")]
    coffee: u32,
}

pub fn decode_reply(body: &[u8]) -> Result<Reply> {
    let mut scratch = [0u8; UNESCAPE_BUFFER_SIZE];
    let (reply, _): (ReplyBody, usize) =
        serde_json_core::from_slice_escaped(body, &mut scratch).map_err(|_| Error::Decode)?;
    Ok(Reply {
        success: reply.success.unwrap_or(true),
        message: screen::text(&reply.message),
    })
}

pub fn decode_stats(body: &[u8]) -> Result<Stats> {
    let mut scratch = [0u8; UNESCAPE_BUFFER_SIZE];
    let (stats, _): (StatsBody, usize) =
        serde_json_core::from_slice_escaped(body, &mut scratch).map_err(|_| Error::Decode)?;
    Ok(Stats {
        tea: stats.tea,
        coffee: stats.coffee,
    })
}
