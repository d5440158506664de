//! Session runtime for the placement dashboard.
//!
//! Owns the registered datasets and memoizes built analysis tables so that
//! filter and threshold changes never reload or renormalize a dataset.

pub mod session;
