//! Data Transfer Objects for the source API
//!
//! Envelopes exchanged over HTTP that are not domain entities themselves.

pub mod ingest;
pub mod page;
