mod ingest;
mod network;
mod render;

use ledstream_core::PipelineStats;

use crate::infrastructure::types::RecordQueue;

pub(crate) use ingest::ingest_task;
pub(crate) use network::{network_runner_task, wifi_connection_task};
pub(crate) use render::render_task;

/// Color records handed from the ingest task to the render task
static RECORD_QUEUE: RecordQueue = RecordQueue::new();

pub(crate) static PIPELINE_STATS: PipelineStats = PipelineStats::new();
