//! Repository layer
//!
//! Repositories abstract communication with the source API. Stages and the
//! orchestrator only see the trait, so they can run against in-memory fakes.

mod records;

pub use records::{HttpRecordRepository, RecordRepository};
