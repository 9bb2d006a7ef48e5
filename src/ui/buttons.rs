//! GPIO button capture.
//!
//! The button (active-low with internal pull-up) drives a GPIOTE channel
//! that fires on every high-to-low transition. [`edge_capture_task`] runs
//! on the high-priority interrupt executor and does nothing but timestamp
//! the edge and hand it to [`EDGE_LATCH`]; classification happens in the
//! main loop.

use defmt::trace;
use embassy_nrf::gpiote::InputChannel;
use embassy_nrf::pac;
use embassy_time::Instant;
use teacounter::config::DEBOUNCE_MS;
use teacounter::input::{ButtonLine, Clock, EdgeLatch, RawEdge};

/// Press edges shared between the capture task and the main loop.
pub static EDGE_LATCH: EdgeLatch = EdgeLatch::new(DEBOUNCE_MS);

/// Wait for press edges forever. Never blocks on anything else.
#[embassy_executor::task]
pub async fn edge_capture_task(channel: InputChannel<'static>) -> ! {
    loop {
        channel.wait().await;
        let now = Instant::now().as_millis() as u32;
        if EDGE_LATCH.capture(RawEdge::press(now)) {
            trace!("Button: press edge at {} ms", now);
        }
    }
}

/// Button level read straight from the port 0 input register.
///
/// The pin itself is owned by the GPIOTE channel, so the level is sampled
/// without going through a driver.
pub struct PortLine {
    pin: usize,
}

impl PortLine {
    pub const fn new(pin: usize) -> Self {
        Self { pin }
    }
}

impl ButtonLine for PortLine {
    fn is_pressed(&mut self) -> bool {
        !pac::P0.in_().read().pin(self.pin)
    }
}

/// Milliseconds since boot from the Embassy time driver.
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
