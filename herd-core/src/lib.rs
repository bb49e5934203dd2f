//! Herd Core
//!
//! Core types and pure transformations for the Herd ETL pipeline.
//!
//! This crate contains:
//! - Domain types: Records and the per-run accounting (BatchResult, RunSummary)
//! - DTOs: Wire envelopes exchanged with the source API
//! - Transform: Field normalization for a single record
//! - Chunk: Splitting ordered sequences into fixed-size batches

pub mod chunk;
pub mod domain;
pub mod dto;
pub mod transform;
