//! Metric names and the `metrics` facade for drape.
//!
//! Crates record through the re-exported macros behind their own optional
//! `metrics` feature. Nothing is exported until the host process installs a
//! recorder.
//!
//! ```rust,ignore
//! use drape_metrics::{counter, labels, routing};
//!
//! counter!(routing::DECISIONS_TOTAL, labels::INTENT => "styling").increment(1);
//! ```

mod definitions;

pub use definitions::*;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
