//! Typed input records for the pipeline.
//!
//! Upstream ingestion and cleaning (out of scope here) delivers tabular
//! snapshots; these modules give them names, enums, and lookup structure.

pub mod claim;
pub mod client;
pub mod contract;
pub mod product;
