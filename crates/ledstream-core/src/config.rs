//! Pipeline configuration and defaults

use embassy_time::Duration;

/// TCP port the listener binds to
pub const DEFAULT_PORT: u16 = 1234;

/// Number of logical pixels on the strip
pub const DEFAULT_LED_COUNT: usize = 300;

/// Records buffered between the ingest and render workers
pub const DEFAULT_QUEUE_CAPACITY: usize = 600;

/// How long the render loop waits for a record before polling again
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Bytes requested from the socket per read
pub const DEFAULT_READ_CHUNK: usize = 3000;

/// Longest wait for a connection to shut down before it is dropped
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// TCP keepalive applied to every accepted connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepaliveConfig {
    /// Idle time before the first probe
    pub idle: Duration,
    /// Time between unanswered probes
    pub interval: Duration,
    /// Unanswered probes before the connection is dropped
    pub probes: u8,
}

impl KeepaliveConfig {
    /// Silence after which the peer is considered gone
    pub fn give_up_after(&self) -> Duration {
        self.idle + self.interval * u32::from(self.probes)
    }
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(1000),
            interval: Duration::from_secs(1000),
            probes: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerConfig {
    pub port: u16,
    pub keepalive: KeepaliveConfig,
    /// Bound on `Connection::close`, a vanished peer must not hold the port
    pub close_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            keepalive: KeepaliveConfig::default(),
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub poll_timeout: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}
