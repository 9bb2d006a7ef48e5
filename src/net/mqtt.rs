//! MQTT notification session.
//!
//! [`mqtt_task`] keeps one session to the broker alive, subscribed to the
//! broadcast topic and this device's own topic, and forwards every payload
//! into [`NOTIFICATIONS`]. The main loop drains the channel through
//! [`MqttInbox`] without ever blocking.

use defmt::{info, warn, Debug2Format};
use embassy_futures::select::{select, Either};
use embassy_net::tcp::TcpSocket;
use embassy_net::{Ipv4Address, Stack};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Timer};
use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;
use teacounter::config::{
    MQTT_BROKER_ADDR, MQTT_BROKER_PORT, MQTT_KEEP_ALIVE_SECS, MQTT_RECONNECT_DELAY_SECS,
    MQTT_TOPIC_PREFIX, RAW_NOTIFICATION_CAPACITY, USER_NAME,
};
use teacounter::notify::{wire, KeepAlive, RawNotification, Transport};
use teacounter::{Error, Result};

/// Payloads waiting for the main loop.
pub static NOTIFICATIONS: Channel<CriticalSectionRawMutex, RawNotification, 4> = Channel::new();

const SOCKET_BUFFER_SIZE: usize = 1024;
const PACKET_BUFFER_SIZE: usize = RAW_NOTIFICATION_CAPACITY + 128;

/// Main-loop side of [`NOTIFICATIONS`].
pub struct MqttInbox;

impl Transport for MqttInbox {
    fn poll(&mut self) -> Option<RawNotification> {
        NOTIFICATIONS.try_receive().ok()
    }
}

#[embassy_executor::task]
pub async fn mqtt_task(stack: Stack<'static>) -> ! {
    let mut rx_buffer = [0u8; SOCKET_BUFFER_SIZE];
    let mut tx_buffer = [0u8; SOCKET_BUFFER_SIZE];

    loop {
        if let Err(e) = session(stack, &mut rx_buffer, &mut tx_buffer).await {
            warn!("MQTT: session ended: {}", e);
        }
        Timer::after_secs(MQTT_RECONNECT_DELAY_SECS).await;
    }
}

/// One broker session. Only returns on failure.
async fn session(stack: Stack<'static>, rx: &mut [u8], tx: &mut [u8]) -> Result<()> {
    let mut socket = TcpSocket::new(stack, rx, tx);
    socket.set_timeout(Some(Duration::from_secs(MQTT_KEEP_ALIVE_SECS as u64 * 2)));

    let [a, b, c, d] = MQTT_BROKER_ADDR;
    socket
        .connect((Ipv4Address::new(a, b, c, d), MQTT_BROKER_PORT))
        .await
        .map_err(|e| {
            warn!("MQTT: connect failed: {}", e);
            Error::Network
        })?;

    let client_id = wire::client_id(MQTT_TOPIC_PREFIX, USER_NAME)?;
    let topics = wire::subscriptions(MQTT_TOPIC_PREFIX, USER_NAME)?;

    let mut config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
    config.add_max_subscribe_qos(QualityOfService::QoS0);
    config.add_client_id(client_id.as_str());
    config.keep_alive = MQTT_KEEP_ALIVE_SECS;
    config.max_packet_size = PACKET_BUFFER_SIZE as u32;

    let mut write_buffer = [0u8; PACKET_BUFFER_SIZE];
    let mut recv_buffer = [0u8; PACKET_BUFFER_SIZE];
    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut write_buffer,
        PACKET_BUFFER_SIZE,
        &mut recv_buffer,
        PACKET_BUFFER_SIZE,
        config,
    );

    client.connect_to_broker().await.map_err(|code| {
        warn!("MQTT: broker refused: {}", Debug2Format(&code));
        Error::Network
    })?;
    for topic in &topics {
        client.subscribe_to_topic(topic.as_str()).await.map_err(|code| {
            warn!("MQTT: subscribe failed: {}", Debug2Format(&code));
            Error::Network
        })?;
    }
    info!("MQTT: subscribed to {} and {}", topics[0].as_str(), topics[1].as_str());

    let mut keep_alive = KeepAlive::new(Instant::now().as_millis(), MQTT_KEEP_ALIVE_SECS);
    loop {
        if keep_alive.is_due(Instant::now().as_millis()) {
            client.send_ping().await.map_err(|code| {
                warn!("MQTT: ping failed: {}", Debug2Format(&code));
                Error::Network
            })?;
            keep_alive.sent(Instant::now().as_millis());
        }

        // Reaching the deadline cancels the pending receive. A packet left
        // half read makes the next receive fail and the session is rebuilt.
        let deadline = Instant::from_millis(keep_alive.deadline_ms());
        match select(client.receive_message(), Timer::at(deadline)).await {
            Either::First(Ok((topic, payload))) => match RawNotification::from_slice(payload) {
                Ok(raw) => NOTIFICATIONS.send(raw).await,
                Err(()) => warn!("MQTT: {} byte payload on {} too large", payload.len(), topic),
            },
            Either::First(Err(code)) => {
                warn!("MQTT: receive failed: {}", Debug2Format(&code));
                return Err(Error::Network);
            }
            Either::Second(()) => {}
        }
    }
}
