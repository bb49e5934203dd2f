//! Ingest DTOs

use serde::{Deserialize, Serialize};

/// Acknowledgement returned by an ingest endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestAck {
    pub message: String,
    pub count: usize,
}

impl IngestAck {
    pub fn received(count: usize) -> Self {
        Self {
            message: format!("Successfully received {} records", count),
            count,
        }
    }
}
