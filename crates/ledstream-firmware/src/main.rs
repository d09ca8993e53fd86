#![no_std]
#![no_main]
#![feature(type_alias_impl_trait)]

#[macro_use]
mod config;
mod infrastructure;

use embassy_executor::Spawner;
use embassy_time::Timer;
use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};
use esp_println::println;
use log::info;

use crate::infrastructure::drivers::{EspLedDriver, init_network_stack, wait_for_connection};
use crate::infrastructure::tasks::{
    PIPELINE_STATS, ingest_task, network_runner_task, render_task, wifi_connection_task,
};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    println!(
        "ledstream {}: {} pixels, port {}",
        config::BUILD_VERSION,
        config::LED_COUNT,
        config::LISTENER.port
    );

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Allocate heap memory for the radio (64 + 32 KB)
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );
    esp_alloc::heap_allocator!(size: 32 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Render worker does not depend on the network
    let driver = EspLedDriver::new(peripherals.RMT, led_gpio!(peripherals));
    spawner.spawn(render_task(driver)).ok();

    // Initialize network stack and spawn network tasks
    let (stack, runner, controller) = init_network_stack(peripherals.WIFI);
    spawner.spawn(wifi_connection_task(controller)).ok();
    spawner.spawn(network_runner_task(runner)).ok();

    // Listen only once an address is assigned
    let ip = wait_for_connection(stack).await;
    info!("network: got address {}", ip.address);
    spawner.spawn(ingest_task(stack)).ok();

    loop {
        Timer::after(config::STATS_INTERVAL).await;
        info!(
            "stats: {:?}, {} connections, {} records, {} frames, {} bytes dropped",
            PIPELINE_STATS.listener_state(),
            PIPELINE_STATS.connections(),
            PIPELINE_STATS.records(),
            PIPELINE_STATS.flushes(),
            PIPELINE_STATS.discarded_bytes()
        );
    }
}
