#![allow(clippy::unreadable_literal)]

use embassy_time::Duration;
use ledstream_core::config::{
    DEFAULT_CLOSE_TIMEOUT, DEFAULT_LED_COUNT, DEFAULT_POLL_TIMEOUT, DEFAULT_PORT,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_READ_CHUNK,
};
use ledstream_core::{KeepaliveConfig, ListenerConfig, SinkConfig};

pub(crate) struct WifiConfig {
    pub ssid: &'static str,
    pub password: &'static str,
}

pub(crate) const WIFI: WifiConfig = WifiConfig {
    ssid: env!("WIFI_SSID"),
    password: env!("WIFI_PASSWORD"),
};

pub(crate) const HOSTNAME: &str = match option_env!("LEDSTREAM_HOSTNAME") {
    Some(hostname) => hostname,
    None => "ledstream",
};

pub(crate) const BUILD_VERSION: &str = env!("BUILD_VERSION");

pub(crate) const LED_COUNT: usize = DEFAULT_LED_COUNT;
pub(crate) const QUEUE_CAPACITY: usize = DEFAULT_QUEUE_CAPACITY;
pub(crate) const READ_CHUNK: usize = DEFAULT_READ_CHUNK;

// Socket buffers, the peer never reads from us
pub(crate) const SOCKET_RX_BUFFER: usize = 4096;
pub(crate) const SOCKET_TX_BUFFER: usize = 128;

pub(crate) const LISTENER: ListenerConfig = ListenerConfig {
    port: DEFAULT_PORT,
    keepalive: KeepaliveConfig {
        idle: Duration::from_secs(1000),
        interval: Duration::from_secs(1000),
        probes: 3,
    },
    close_timeout: DEFAULT_CLOSE_TIMEOUT,
};

pub(crate) const SINK: SinkConfig = SinkConfig {
    poll_timeout: DEFAULT_POLL_TIMEOUT,
};

pub(crate) const STATS_INTERVAL: Duration = Duration::from_secs(30);

macro_rules! led_gpio {
    ($p:expr) => {
        $p.GPIO17
    };
}
