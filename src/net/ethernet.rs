//! W5500 bring-up and the `embassy-net` stack.

use defmt::{error, info, unwrap};
use embassy_executor::Spawner;
use embassy_net::{Stack, StackResources};
use embassy_net_wiznet::chip::W5500;
use embassy_net_wiznet::{Device, Runner, State};
use embassy_nrf::gpio::{Input, Output};
use embassy_nrf::peripherals::SPI3;
use embassy_nrf::spim::Spim;
use embassy_time::{with_timeout, Delay, Duration};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use teacounter::config::{ETHERNET_UP_TIMEOUT_SECS, MAC_ADDRESS};

/// W5500 on its own SPI bus with a dedicated chip select.
pub type EthernetSpi = ExclusiveDevice<Spim<'static, SPI3>, Output<'static>, Delay>;

type EthernetRunner = Runner<'static, W5500, EthernetSpi, Input<'static>, Output<'static>>;

/// DHCP, DNS, the HTTP client and the MQTT session.
const SOCKETS: usize = 4;

#[embassy_executor::task]
async fn ethernet_task(runner: EthernetRunner) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, Device<'static>>) -> ! {
    runner.run().await
}

/// Start the W5500 and wait for a DHCP lease.
///
/// Returns `None` if the chip does not answer or no address arrives within
/// `ETHERNET_UP_TIMEOUT_SECS`.
pub async fn start(
    spawner: Spawner,
    spi: EthernetSpi,
    int: Input<'static>,
    reset: Output<'static>,
    seed: u64,
) -> Option<Stack<'static>> {
    static STATE: StaticCell<State<8, 8>> = StaticCell::new();
    static RESOURCES: StaticCell<StackResources<SOCKETS>> = StaticCell::new();

    info!("Ethernet: starting W5500");
    let state = STATE.init(State::<8, 8>::new());
    let (device, runner) =
        match embassy_net_wiznet::new::<8, 8, W5500, _, _, _>(MAC_ADDRESS, state, spi, int, reset)
            .await
        {
            Ok(parts) => parts,
            Err(_) => {
                error!("Ethernet: W5500 not responding");
                return None;
            }
        };
    unwrap!(spawner.spawn(ethernet_task(runner)));

    let config = embassy_net::Config::dhcpv4(Default::default());
    let (stack, runner) = embassy_net::new(device, config, RESOURCES.init(StackResources::new()), seed);
    unwrap!(spawner.spawn(net_task(runner)));

    info!("Ethernet: waiting for DHCP");
    let up = Duration::from_secs(ETHERNET_UP_TIMEOUT_SECS);
    if with_timeout(up, stack.wait_config_up()).await.is_err() {
        error!("Ethernet: no address after {} s", ETHERNET_UP_TIMEOUT_SECS);
        return None;
    }

    if let Some(config) = stack.config_v4() {
        info!("Ethernet: up, address {}", config.address);
    }
    Some(stack)
}
