//! Figure generators for the decoded log data
//!
//! This module contains the rendering stage of the pipeline:
//! - Game-length histogram
//! - Per-named-field scatter plots with mean and deviation
//! - Per-iteration scatter and per-unnamed-field histograms

pub mod game_lengths;
pub mod iterations;
pub mod ply_fields;

// Re-export figure generators for convenience
pub use game_lengths::generate_game_length_plot;
pub use iterations::{generate_iteration_field_plots, generate_iteration_scatter};
pub use ply_fields::generate_ply_field_plots;
