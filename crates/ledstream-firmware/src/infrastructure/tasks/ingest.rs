use embassy_net::Stack;
use log::error;

use ledstream_core::ConnectionListener;

use crate::config;
use crate::infrastructure::drivers::TcpAcceptor;
use crate::infrastructure::tasks::{PIPELINE_STATS, RECORD_QUEUE};

/// Task accepting stream connections and framing their bytes into records
///
/// Runs until the listener hits a fatal fault. The render task keeps
/// showing the last frame afterwards.
#[embassy_executor::task]
pub(crate) async fn ingest_task(stack: Stack<'static>) {
    let mut rx_buffer = [0u8; config::SOCKET_RX_BUFFER];
    let mut tx_buffer = [0u8; config::SOCKET_TX_BUFFER];
    let mut read_buffer = [0u8; config::READ_CHUNK];

    let acceptor = TcpAcceptor::new(stack, &mut rx_buffer, &mut tx_buffer);
    let mut listener = ConnectionListener::new(acceptor, config::LISTENER, &mut read_buffer)
        .with_stats(&PIPELINE_STATS);

    let producer = RECORD_QUEUE.producer();
    let Err(fault) = listener.serve(&producer).await;
    error!("ingest: listener stopped: {}", fault);
}
