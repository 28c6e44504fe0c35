//! implore-io - Chart data I/O
//!
//! This crate turns chart sources into a uniform [`TabularData`]:
//!
//! - **JSON**: `{"columns": [...], "data": [...]}` chart documents
//! - **CSV/TSV**: header row plus records
//!
//! # Design
//!
//! All readers implement the `TableReader` trait for uniform access.
//! Cell values stay raw; [`parse_numeric`] converts them on demand and
//! reports unconvertible cells as `None` rather than failing.

pub mod json_reader;
pub mod numeric;
pub mod reader;
pub mod schema;

#[cfg(feature = "csv")]
pub mod csv_reader;

pub use numeric::*;
pub use reader::*;
pub use schema::*;
