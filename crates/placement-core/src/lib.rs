//! Core types for the placement dashboard.
//!
//! Holds the typed record model, the field normalizer that absorbs the loose
//! shapes found in recruitment datasets, date parsing, small statistics and
//! formatting helpers, the error type and the command-line settings.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod normalize;
pub mod settings;
pub mod stats;

pub use error::{PlacementError, Result};
