//! Hardware and network plumbing around the pipeline

pub(crate) mod drivers;
pub(crate) mod tasks;
pub(crate) mod types;
