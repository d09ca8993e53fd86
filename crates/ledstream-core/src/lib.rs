#![cfg_attr(not(test), no_std)]

//! Network-to-pixel streaming pipeline
//!
//! Architecture layers:
//! - `record` - Wire unit, one `(r, g, b)` triple
//! - `framer` - Groups a raw byte stream into color records
//! - `channel` - Bounded FIFO between the ingest and render workers
//! - `frame` - Fixed-size pixel buffer with a wrapping write cursor
//! - `sink` - Render loop, flushes completed frames to the [`LedDriver`]
//! - `listener` - Sequential connection lifecycle feeding the framer
//! - `stats` - Counters for external observation
//!
//! The pipeline is generic over the transport ([`ConnectionAcceptor`]) and
//! the output hardware ([`LedDriver`]), so it runs the same on the device and
//! in host tests.

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod frame;
pub mod framer;
pub mod listener;
pub mod record;
pub mod sink;
pub mod stats;

pub use channel::{RecordChannel, RecordConsumer, RecordProducer};
pub use config::{KeepaliveConfig, ListenerConfig, SinkConfig};
pub use driver::LedDriver;
pub use error::{HardwareFault, ListenerFault};
pub use frame::PixelFrame;
pub use framer::{ByteFramer, SessionEnd, SessionReport};
pub use listener::{Connection, ConnectionAcceptor, ConnectionListener, ListenerState};
pub use record::{ColorRecord, RECORD_SIZE};
pub use sink::PixelSink;
pub use stats::PipelineStats;
