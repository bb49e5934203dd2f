//! Run scheduling
//!
//! Drives one pipeline run: page discovery, chunking, per-chunk ETL tasks
//! and the fold into a `RunSummary`.

mod pipeline;

pub use pipeline::EtlPipeline;
