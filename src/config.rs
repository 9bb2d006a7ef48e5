//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, endpoints and buffer
//! sizes live here so they can be tuned in one place.

// Button timing

/// Minimum spacing between two accepted press edges (ms).
pub const DEBOUNCE_MS: u32 = 50;

/// Hold time after which a press counts as a long press (ms).
pub const LONG_PRESS_MS: u32 = 1000;

/// Window after a release in which a second press makes a double tap (ms).
pub const DOUBLE_CLICK_WINDOW_MS: u32 = 500;

/// Main loop period (ms).
pub const TICK_MS: u64 = 10;

// Screen

/// How long result, notification and welcome screens stay up (ms).
pub const SCREEN_HOLD_MS: u32 = 2000;

/// Maximum length of any text carried in a `ScreenState`.
pub const TEXT_CAPACITY: usize = 96;

/// Characters per line with the 6x10 font on a 128 px wide panel.
pub const DISPLAY_COLUMNS: usize = 21;

/// Text lines that fit under a heading on the 64 px tall panel.
pub const DISPLAY_BODY_LINES: usize = 4;

// Notifications

/// Queued notifications before the oldest is dropped.
pub const NOTIFICATION_QUEUE_CAPACITY: usize = 16;

/// Largest MQTT payload we accept (bytes).
pub const RAW_NOTIFICATION_CAPACITY: usize = 256;

/// Topic prefix; we subscribe to `{prefix}/all` and `{prefix}/{user}`.
pub const MQTT_TOPIC_PREFIX: &str = "teacounter";

/// MQTT broker address (IPv4) and port.
pub const MQTT_BROKER_ADDR: [u8; 4] = [192, 168, 101, 197];
pub const MQTT_BROKER_PORT: u16 = 1883;

/// Keep-alive negotiated with the broker (seconds).
pub const MQTT_KEEP_ALIVE_SECS: u16 = 60;

/// Pause before reconnecting a dropped MQTT session (seconds).
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 5;

// Counting service

/// Name this device registers drinks for. Change per device.
pub const USER_NAME: &str = "doug";

/// Counting service HTTP endpoint.
pub const SERVER_HOST: &str = "192.168.101.197";
pub const SERVER_PORT: u16 = 8000;

/// Upper bound on a single HTTP round-trip (ms).
pub const HTTP_TIMEOUT_MS: u64 = 5000;

/// Receive buffer for HTTP headers + body (bytes).
pub const HTTP_RX_BUFFER_SIZE: usize = 1024;

// Ethernet (W5500)

/// Locally administered MAC address.
pub const MAC_ADDRESS: [u8; 6] = [0x02, 0x00, 0x00, 0x74, 0x65, 0x61];

/// Time allowed for link + DHCP at start-up (seconds).
pub const ETHERNET_UP_TIMEOUT_SECS: u64 = 10;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button         → P0.24 (active-low, internal pull-up)
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
//   W5500 SCK      → P1.15
//   W5500 MOSI     → P1.13
//   W5500 MISO     → P1.14
//   W5500 CS       → P1.12
//   W5500 INT      → P1.11
//   W5500 RESET    → P1.10

/// Port 0 pin number of the button, used for level polling.
pub const BUTTON_PIN: usize = 24;
