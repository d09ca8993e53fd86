use embassy_net::Runner;
use embassy_time::{Duration, Timer};
use esp_println::println;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, PowerSaveMode, WifiController, WifiDevice, WifiEvent,
    WifiStaState,
};

use crate::config;

// Consecutive failures before backing off for longer
const MAX_QUICK_ATTEMPTS: u32 = 5;
const QUICK_RETRY: Duration = Duration::from_millis(5000);
const SLOW_RETRY: Duration = Duration::from_secs(30);

/// Background task for connecting to the `WiFi` network
///
/// It connects to the `WiFi` network and waits for the connection to be established.
/// If the connection is lost, it tries to reconnect.
#[embassy_executor::task]
pub(crate) async fn wifi_connection_task(mut controller: WifiController<'static>) {
    let mut failures: u32 = 0;
    loop {
        // Wait until we're no longer connected
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            println!("network: disconnected");
            Timer::after(Duration::from_millis(2000)).await;
        }
        if !matches!(controller.is_started(), Ok(true)) {
            let client_config = if config::WIFI.password.is_empty() {
                ClientConfig::default()
                    .with_ssid(config::WIFI.ssid.into())
                    .with_auth_method(AuthMethod::None)
            } else {
                ClientConfig::default()
                    .with_ssid(config::WIFI.ssid.into())
                    .with_password(config::WIFI.password.into())
            };
            let mode_config = ModeConfig::Client(client_config);
            if let Err(e) = controller.set_config(&mode_config) {
                println!("network: invalid wifi config: {e:?}");
                Timer::after(SLOW_RETRY).await;
                continue;
            }
            if let Err(e) = controller.start_async().await {
                println!("network: unable to start wifi: {e:?}");
                Timer::after(QUICK_RETRY).await;
                continue;
            }
            // Modem sleep delays inbound frames by a beacon interval
            if let Err(e) = controller.set_power_saving(PowerSaveMode::None) {
                println!("network: unable to disable power saving: {e:?}");
            }
        }

        println!("network: connecting to {}", config::WIFI.ssid);
        match controller.connect_async().await {
            Ok(()) => {
                failures = 0;
                println!("network: connected");
            }
            Err(e) => {
                failures += 1;
                println!("network: error connecting (attempt {failures}): {e:?}");
                if failures < MAX_QUICK_ATTEMPTS {
                    Timer::after(QUICK_RETRY).await;
                } else {
                    Timer::after(SLOW_RETRY).await;
                }
            }
        }
    }
}

/// Background task for running the network stack
#[embassy_executor::task]
pub(crate) async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}
