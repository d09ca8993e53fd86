use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use ledstream_core::RecordChannel;

use crate::config;
use crate::infrastructure::drivers::EspLedDriver;

pub(crate) type LightDriver = EspLedDriver;

pub(crate) type RecordQueue = RecordChannel<CriticalSectionRawMutex, { config::QUEUE_CAPACITY }>;
