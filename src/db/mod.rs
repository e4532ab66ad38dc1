//! Database access layer.
//!
//! This module provides:
//! - Scoped per-call connection lifecycle (open, use, always close)
//! - Row-to-text decoding for result rendering

pub mod connection;
pub mod decode;

pub use connection::{open, with_connection};
pub use decode::{column_names, row_to_text};
