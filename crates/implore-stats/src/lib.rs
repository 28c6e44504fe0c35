//! implore-stats - Statistical functions for chart insight scoring
//!
//! This crate provides the statistical primitives that fact scoring uses:
//!
//! - **SummaryStats**: count, sum, extrema, mean, population and sample variance
//! - **Z-scores**: against the sample (ddof = 1) standard deviation, with
//!   degenerate (single-value or zero-spread) series reported as `None`

pub mod summary;

pub use summary::*;
