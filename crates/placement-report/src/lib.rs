//! Presentation layer for the placement dashboard.
//!
//! Renders a [`placement_data::analysis::Dashboard`] as a plain-text report or
//! as JSON for external chart renderers.

pub mod report;
pub mod table_view;
