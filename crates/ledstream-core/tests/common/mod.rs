//! Test doubles shared by the integration tests.

#![allow(dead_code, unreachable_pub)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;

use embassy_futures::block_on;
use embassy_futures::select::{Either, select};
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Duration;
use embedded_io_async::{ErrorKind, ErrorType, Read};

use ledstream_core::{
    ColorRecord, Connection, ConnectionAcceptor, ConnectionListener, KeepaliveConfig, LedDriver,
    ListenerConfig, ListenerFault, ListenerState, PipelineStats, PixelSink, RecordChannel, SinkConfig,
};

pub type TestChannel<const C: usize> = RecordChannel<CriticalSectionRawMutex, C>;

pub const FAST_POLL: SinkConfig = SinkConfig {
    poll_timeout: Duration::from_millis(1),
};

// -----------------------------------------------------------------------------
// Byte helpers
// -----------------------------------------------------------------------------

/// `count` distinguishable triples, numbered from `first`
pub fn triples(first: usize, count: usize) -> Vec<u8> {
    (first..first + count)
        .flat_map(|i| {
            let [lo, hi, ..] = i.to_le_bytes();
            [lo, hi, lo ^ 0xA5]
        })
        .collect()
}

pub fn records_of(bytes: &[u8]) -> Vec<ColorRecord> {
    bytes
        .chunks_exact(3)
        .map(|c| ColorRecord::new(c[0], c[1], c[2]))
        .collect()
}

// -----------------------------------------------------------------------------
// Scripted transport
// -----------------------------------------------------------------------------

/// One read outcome of a scripted connection
#[derive(Debug, Clone)]
pub enum Step {
    Data(Vec<u8>),
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedError {
    PortInUse,
    Exhausted,
}

#[derive(Debug, Default)]
pub struct AcceptorLog {
    pub bound: Cell<Option<u16>>,
    pub accepted: Cell<usize>,
    pub closed: Cell<usize>,
    pub keepalive: Cell<Option<KeepaliveConfig>>,
    /// Listener state seen at each transport call, when observed
    pub states: RefCell<Vec<(&'static str, ListenerState)>>,
    observer: Cell<Option<&'static PipelineStats>>,
    hang_on_close: Cell<bool>,
}

impl AcceptorLog {
    fn observe(&self, call: &'static str) {
        if let Some(stats) = self.observer.get() {
            self.states.borrow_mut().push((call, stats.listener_state()));
        }
    }
}

/// Serves the scripted sessions in order, then fails to accept
pub struct ScriptedAcceptor {
    sessions: VecDeque<Vec<Step>>,
    fail_bind: bool,
    /// Keep waiting instead of failing once the sessions run out
    wait_when_exhausted: bool,
    pub log: AcceptorLog,
}

impl ScriptedAcceptor {
    pub fn new(sessions: Vec<Vec<Step>>) -> Self {
        Self {
            sessions: sessions.into(),
            fail_bind: false,
            wait_when_exhausted: false,
            log: AcceptorLog::default(),
        }
    }

    /// Record the listener state from `stats` at every transport call
    pub fn observed_by(self, stats: &'static PipelineStats) -> Self {
        self.log.observer.set(Some(stats));
        self
    }

    /// Connections never finish closing
    pub fn hanging_close(self) -> Self {
        self.log.hang_on_close.set(true);
        self
    }

    pub fn waiting_when_exhausted(mut self) -> Self {
        self.wait_when_exhausted = true;
        self
    }

    pub fn failing_bind() -> Self {
        Self {
            fail_bind: true,
            ..Self::new(Vec::new())
        }
    }
}

impl ConnectionAcceptor for ScriptedAcceptor {
    type Error = ScriptedError;
    type Connection<'a> = ScriptedConnection<'a>;

    fn bind(&mut self, port: u16) -> Result<(), ScriptedError> {
        if self.fail_bind {
            return Err(ScriptedError::PortInUse);
        }
        self.log.bound.set(Some(port));
        Ok(())
    }

    async fn accept(&mut self) -> Result<ScriptedConnection<'_>, ScriptedError> {
        self.log.observe("accept");
        if self.sessions.is_empty() && self.wait_when_exhausted {
            core::future::pending::<()>().await;
        }
        let steps = self.sessions.pop_front().ok_or(ScriptedError::Exhausted)?;
        self.log.accepted.set(self.log.accepted.get() + 1);
        Ok(ScriptedConnection::new(steps, &self.log))
    }
}

/// Replays its steps, splitting data to the reader's buffer size
pub struct ScriptedConnection<'a> {
    steps: VecDeque<Step>,
    log: &'a AcceptorLog,
}

impl<'a> ScriptedConnection<'a> {
    pub fn new(steps: Vec<Step>, log: &'a AcceptorLog) -> Self {
        Self {
            steps: steps.into(),
            log,
        }
    }
}

impl ErrorType for ScriptedConnection<'_> {
    type Error = ErrorKind;
}

impl Read for ScriptedConnection<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        self.log.observe("read");
        match self.steps.pop_front() {
            None => Ok(0),
            Some(Step::Fail) => Err(ErrorKind::ConnectionReset),
            Some(Step::Data(mut bytes)) => {
                if bytes.len() > buf.len() {
                    let rest = bytes.split_off(buf.len());
                    self.steps.push_front(Step::Data(rest));
                }
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
        }
    }
}

impl Connection for ScriptedConnection<'_> {
    fn configure_keepalive(&mut self, keepalive: &KeepaliveConfig) {
        self.log.observe("keepalive");
        self.log.keepalive.set(Some(*keepalive));
    }

    async fn close(self) {
        self.log.observe("close");
        self.log.closed.set(self.log.closed.get() + 1);
        if self.log.hang_on_close.get() {
            core::future::pending::<()>().await;
        }
    }
}

// -----------------------------------------------------------------------------
// LED drivers
// -----------------------------------------------------------------------------

/// Keeps a copy of every flushed frame
#[derive(Debug)]
pub struct RecordingDriver<const N: usize> {
    pub frames: Vec<[ColorRecord; N]>,
}

impl<const N: usize> Default for RecordingDriver<N> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<const N: usize> LedDriver<N> for RecordingDriver<N> {
    type Error = Infallible;

    fn write(&mut self, colors: &[ColorRecord; N]) -> Result<(), Infallible> {
        self.frames.push(*colors);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError;

/// Accepts `healthy` flushes, then reports a bus error
#[derive(Debug)]
pub struct FailingDriver {
    pub healthy: usize,
    pub writes: usize,
}

impl<const N: usize> LedDriver<N> for FailingDriver {
    type Error = BusError;

    fn write(&mut self, _colors: &[ColorRecord; N]) -> Result<(), BusError> {
        self.writes += 1;
        if self.writes > self.healthy {
            return Err(BusError);
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Full pipeline
// -----------------------------------------------------------------------------

pub struct PipelineRun<const N: usize> {
    pub frames: Vec<[ColorRecord; N]>,
    pub cursor: usize,
    pub pixels: [ColorRecord; N],
    pub fault: ListenerFault<ScriptedError>,
    pub accepted: usize,
    pub closed: usize,
    pub connections: u32,
    pub records: u32,
    pub discarded: u32,
    pub flushes: u32,
}

/// Run both workers over the scripted sessions until the listener gives up
/// and the channel is drained.
pub fn run_pipeline<const N: usize, const C: usize>(sessions: Vec<Vec<Step>>) -> PipelineRun<N> {
    let stats = PipelineStats::new();
    let channel = TestChannel::<C>::new();
    let producer = channel.producer();
    let consumer = channel.consumer();

    let mut buffer = [0u8; 64];
    let mut listener = ConnectionListener::new(
        ScriptedAcceptor::new(sessions),
        ListenerConfig::default(),
        &mut buffer,
    )
    .with_stats(&stats);
    let mut sink: PixelSink<'_, RecordingDriver<N>, N> =
        PixelSink::new(RecordingDriver::default(), FAST_POLL).with_stats(&stats);

    let fault = block_on(async {
        let ingest = async {
            let fault = listener.serve(&producer).await.unwrap_err();
            while !channel.is_empty() {
                yield_now().await;
            }
            fault
        };
        match select(sink.run(&consumer), ingest).await {
            Either::First(result) => panic!("render worker stopped: {:?}", result.err()),
            Either::Second(fault) => fault,
        }
    });

    PipelineRun {
        frames: sink.driver().frames.clone(),
        cursor: sink.frame().cursor(),
        pixels: *sink.frame().pixels(),
        fault,
        accepted: listener.acceptor().log.accepted.get(),
        closed: listener.acceptor().log.closed.get(),
        connections: stats.connections(),
        records: stats.records(),
        discarded: stats.discarded_bytes(),
        flushes: stats.flushes(),
    }
}
