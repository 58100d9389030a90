//! Common infrastructure modules shared across pipeline stages
//!
//! This module provides reusable infrastructure for:
//! - The decoded-log data model and numeric cell coercion
//! - Missing-aware descriptive statistics
//! - Plotting scaffolding and figure naming

pub mod data_structures;
pub mod plots;
pub mod stats;

// Re-export commonly used items
pub use data_structures::{CellValue, DecodedLogs, LogData, PlyRecord, ShapeSummary};
pub use plots::PlotError;
