//! MQTT notification payloads and topic names.
//!
//! Payload: `{"type": "message" | "celebration", "message": "...", "timestamp": "..."}`

use core::fmt::Write;

use heapless::String;
use serde::Deserialize;

use super::{Notification, NotificationKind};
use crate::config::RAW_NOTIFICATION_CAPACITY;
use crate::error::{Error, Result};
use crate::screen;

pub const TOPIC_CAPACITY: usize = 64;

pub type Topic = String<TOPIC_CAPACITY>;

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum PayloadType {
    Message,
    Celebration,
}

#[derive(Deserialize)]
struct Payload {
    #[serde(rename = "type")]
    kind: PayloadType,
    message: String<RAW_NOTIFICATION_CAPACITY>,
}

/// Decode one inbound payload. Unknown types and malformed JSON are
/// [`Error::Decode`].
pub fn decode(payload: &[u8]) -> Result<Notification> {
    let mut scratch = [0u8; RAW_NOTIFICATION_CAPACITY];
    let (payload, _): (Payload, usize) =
        serde_json_core::from_slice_escaped(payload, &mut scratch).map_err(|_| Error::Decode)?;

    let kind = match payload.kind {
        PayloadType::Message => NotificationKind::Info,
        PayloadType::Celebration => NotificationKind::Celebration,
    };
    Ok(Notification {
        kind,
        text: screen::text(&payload.message),
    })
}

/// Client id announced to the broker.
pub fn client_id(prefix: &str, user: &str) -> Result<Topic> {
    let mut id = Topic::new();
    write!(id, "{}_{}", prefix, user).map_err(|_| Error::BufferOverflow)?;
    Ok(id)
}

/// Topics every device subscribes to: the broadcast one and its own.
pub fn subscriptions(prefix: &str, user: &str) -> Result<[Topic; 2]> {
    let mut all = Topic::new();
    write!(all, "{}/all", prefix).map_err(|_| Error::BufferOverflow)?;
    let mut own = Topic::new();
    write!(own, "{}/{}", prefix, user).map_err(|_| Error::BufferOverflow)?;
    Ok([all, own])
}
