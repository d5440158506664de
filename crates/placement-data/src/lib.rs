//! Data pipeline for the placement dashboard.
//!
//! Responsible for reading recruitment datasets, building the typed analysis
//! table, filtering it and computing the aggregations behind every view.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod reader;
pub mod table;

pub use placement_core as core;
