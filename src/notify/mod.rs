//! Broadcast notifications - transport polling, decoding and queueing.
//!
//! Each main-loop tick pulls at most one payload from the [`Transport`],
//! decodes it into a [`Notification`] and appends it to a bounded FIFO.
//! Draining hands out at most one entry per call.

pub mod keepalive;
pub mod queue;
pub mod wire;

use heapless::Vec;

use crate::config::{NOTIFICATION_QUEUE_CAPACITY, RAW_NOTIFICATION_CAPACITY};
use crate::screen::{ScreenState, Text};

pub use keepalive::KeepAlive;
pub use queue::NotificationQueue;

/// Undecoded payload as delivered by the transport.
pub type RawNotification = Vec<u8, RAW_NOTIFICATION_CAPACITY>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotificationKind {
    Info,
    Celebration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: Text,
}

impl Notification {
    pub fn into_screen(self) -> ScreenState {
        match self.kind {
            NotificationKind::Info => ScreenState::Info { text: self.text },
            NotificationKind::Celebration => ScreenState::Celebration { text: self.text },
        }
    }
}

/// Publish/subscribe collaborator, already connected and subscribed.
pub trait Transport {
    /// Next inbound payload, if one has arrived. Never blocks.
    fn poll(&mut self) -> Option<RawNotification>;
}

pub struct NotificationDrain<T, const N: usize = NOTIFICATION_QUEUE_CAPACITY> {
    transport: T,
    queue: NotificationQueue<N>,
}

impl<T: Transport, const N: usize> NotificationDrain<T, N> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            queue: NotificationQueue::new(),
        }
    }

    /// Pull at most one payload from the transport into the queue.
    ///
    /// Returns `true` if a notification was enqueued.
    pub fn poll_transport(&mut self) -> bool {
        let Some(raw) = self.transport.poll() else {
            return false;
        };

        match wire::decode(&raw) {
            Ok(notification) => {
                debug!("notification enqueued: {}", notification.kind);
                if let Some(dropped) = self.queue.push(notification) {
                    warn!("notification queue full, dropped oldest {}", dropped.kind);
                }
                true
            }
            Err(e) => {
                warn!("notification dropped: {} ({} bytes)", e, raw.len());
                false
            }
        }
    }

    /// Oldest queued notification as a screen.
    pub fn drain_one(&mut self) -> Option<ScreenState> {
        self.queue.pop().map(Notification::into_screen)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> &NotificationQueue<N> {
        &self.queue
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
