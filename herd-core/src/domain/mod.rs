//! Core domain types
//!
//! This module contains the structures that flow through one pipeline run.
//! None of them outlive the run that created them.

pub mod batch;
pub mod record;
