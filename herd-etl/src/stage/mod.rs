//! Pipeline stages
//!
//! - Discovery: walk the listing until an empty page
//! - Extract: fetch and transform a batch of records under an admission gate
//! - Load: post a transformed batch and account for it

pub mod discovery;
pub mod extract;
pub mod load;

pub use discovery::discover_all_ids;
pub use extract::{ExtractOutcome, fetch_and_transform};
pub use load::load_batch;
