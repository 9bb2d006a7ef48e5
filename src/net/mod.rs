//! Networking subsystem - W5500 Ethernet and the two services on top of it.
//!
//! 1. **Ethernet** - brings up the W5500 over SPI and an `embassy-net`
//!    stack configured by DHCP.
//! 2. **HTTP** - the counting service client (`register`, `undo`, `stats`).
//! 3. **MQTT** - a session task subscribed to the notification topics,
//!    forwarding payloads to the main loop through a channel.

pub mod ethernet;
pub mod http;
pub mod mqtt;
