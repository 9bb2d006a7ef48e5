//! teacounter - one-button tea/coffee counter on the nRF52840.
//!
//! ## Task layout
//!
//! | Task                | Executor          | Role                                  |
//! |---------------------|-------------------|---------------------------------------|
//! | `edge_capture_task` | interrupt (P6)    | timestamp press edges into the latch  |
//! | `ethernet_task`     | thread            | W5500 driver                          |
//! | `net_task`          | thread            | embassy-net stack (DHCP, TCP)         |
//! | `mqtt_task`         | thread            | broker session → notification channel |
//! | `main`              | thread            | `App::tick` every `TICK_MS`           |
//!
//! The main loop owns the classifier, the dispatcher and the screen; the
//! only state it shares with an interrupt-priority context is the edge latch.

#![no_std]
#![no_main]

mod net;
mod ui;

use defmt::{error, info, unwrap};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::gpiote::{InputChannel, InputChannelPolarity};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::rng::{self, Rng};
use embassy_nrf::{bind_interrupts, peripherals, spim, twim};
use embassy_time::{Delay, Duration, Ticker, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use teacounter::config::{BUTTON_PIN, TICK_MS, USER_NAME};
use teacounter::screen::{self, Renderer, ScreenState};
use teacounter::App;
use {defmt_rtt as _, panic_probe as _};

use crate::net::http::HttpService;
use crate::net::mqtt::MqttInbox;
use crate::ui::buttons::{PortLine, UptimeClock, EDGE_LATCH};
use crate::ui::display::OledScreen;

bind_interrupts!(struct Irqs {
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    RNG => rng::InterruptHandler<peripherals::RNG>;
});

/// Runs edge capture above the thread-mode main loop.
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn EGU1_SWI1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("teacounter starting for user {}", USER_NAME);

    // Button: GPIOTE channel on P0.24, captured at interrupt priority.
    interrupt::EGU1_SWI1.set_priority(Priority::P6);
    let high = EXECUTOR_HIGH.start(interrupt::EGU1_SWI1);
    let button = Input::new(p.P0_24, Pull::Up);
    let channel = InputChannel::new(p.GPIOTE_CH0, button, InputChannelPolarity::HiToLo);
    unwrap!(high.spawn(ui::buttons::edge_capture_task(channel)));

    // Display: SSD1306 on TWIM0 (SDA P0.26, SCL P0.27).
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut oled = OledScreen::new(i2c, USER_NAME);

    // Ethernet: W5500 on SPIM3.
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::M8;
    let spi = spim::Spim::new(p.SPI3, Irqs, p.P1_15, p.P1_14, p.P1_13, spi_config);
    let cs = Output::new(p.P1_12, Level::High, OutputDrive::Standard);
    let int = Input::new(p.P1_11, Pull::Up);
    let reset = Output::new(p.P1_10, Level::High, OutputDrive::Standard);
    let spi = unwrap!(ExclusiveDevice::new(spi, cs, Delay));

    let mut rng = Rng::new(p.RNG, Irqs);
    let mut seed = [0u8; 8];
    rng.blocking_fill_bytes(&mut seed);

    let Some(stack) =
        net::ethernet::start(spawner, spi, int, reset, u64::from_le_bytes(seed)).await
    else {
        error!("Cannot start without internet");
        oled.render(&ScreenState::ErrorMsg {
            text: screen::text("Cannot start without internet"),
        });
        loop {
            Timer::after_secs(1).await;
        }
    };

    unwrap!(spawner.spawn(net::mqtt::mqtt_task(stack)));

    let service = HttpService::new(stack, USER_NAME);
    let mut app = App::new(&EDGE_LATCH, service, MqttInbox, oled);
    let clock = UptimeClock;
    let mut line = PortLine::new(BUTTON_PIN);

    app.start(&clock).await;
    info!("Ready! Press the button to count drinks");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    loop {
        app.tick(&clock, &mut line).await;
        ticker.next().await;
    }
}
