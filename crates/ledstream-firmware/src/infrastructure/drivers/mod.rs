mod led_ws2812;
mod network;
mod random;
mod tcp;

pub(crate) use led_ws2812::EspLedDriver;
pub(crate) use network::{init_network_stack, wait_for_connection};
pub(crate) use tcp::TcpAcceptor;
