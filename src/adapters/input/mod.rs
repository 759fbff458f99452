//! Input Adapters - Listing Rows
//!
//! Reads the fixed list of product rows once at startup.

pub mod csv_rows;

pub use csv_rows::{load_rows, parse_rows};
