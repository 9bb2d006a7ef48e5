//! Single-slot handoff of press edges from interrupt context to the main loop.
//!
//! The interrupt side calls [`EdgeLatch::capture`]; the main loop calls
//! [`EdgeLatch::peek`] / [`EdgeLatch::take`]. Both run inside a
//! `critical_section`, so neither side can observe a half-written slot.

use core::cell::RefCell;

use critical_section::Mutex;

use super::{DebounceFilter, RawEdge};

/// The one outstanding press shared between the two contexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingEdge {
    pub timestamp: u32,
    pub consumed: bool,
}

impl PendingEdge {
    const fn empty() -> Self {
        Self {
            timestamp: 0,
            consumed: true,
        }
    }
}

struct Slot {
    filter: DebounceFilter,
    edge: PendingEdge,
}

pub struct EdgeLatch {
    slot: Mutex<RefCell<Slot>>,
}

impl EdgeLatch {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            slot: Mutex::new(RefCell::new(Slot {
                filter: DebounceFilter::new(debounce_ms),
                edge: PendingEdge::empty(),
            })),
        }
    }

    /// Interrupt side: debounce `edge` and publish it if accepted.
    ///
    /// Never blocks or allocates. While an earlier press is still
    /// unconsumed it is kept and the newer one is merged into it.
    /// Returns whether the filter accepted the edge.
    pub fn capture(&self, edge: RawEdge) -> bool {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow_ref_mut(cs);
            if !slot.filter.accept(edge) {
                return false;
            }
            if slot.edge.consumed {
                slot.edge = PendingEdge {
                    timestamp: edge.timestamp,
                    consumed: false,
                };
            }
            true
        })
    }

    /// Timestamp of the unconsumed press, without consuming it.
    pub fn peek(&self) -> Option<u32> {
        critical_section::with(|cs| {
            let slot = self.slot.borrow_ref(cs);
            (!slot.edge.consumed).then_some(slot.edge.timestamp)
        })
    }

    /// Consume the pending press, if there is one.
    pub fn take(&self) -> Option<u32> {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow_ref_mut(cs);
            if slot.edge.consumed {
                return None;
            }
            slot.edge.consumed = true;
            Some(slot.edge.timestamp)
        })
    }

    /// Snapshot of the slot (diagnostics and tests).
    pub fn pending(&self) -> PendingEdge {
        critical_section::with(|cs| self.slot.borrow_ref(cs).edge)
    }
}
