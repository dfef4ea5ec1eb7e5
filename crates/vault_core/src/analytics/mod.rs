//! Read-only analytics over the full record set.
//!
//! # Responsibility
//! - Derive aggregate statistics in a single pass.
//! - Render and write the fixed-layout text export.
//!
//! # Invariants
//! - Nothing in this module mutates the store.
//! - All rendered timestamps are UTC.

pub mod export;
pub mod stats;

use chrono::DateTime;

/// Formats epoch milliseconds as `YYYY-MM-DD`.
pub fn format_date(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(value) => value.format("%Y-%m-%d").to_string(),
        None => epoch_ms.to_string(),
    }
}

/// Formats epoch milliseconds as `YYYY-MM-DD HH:MM:SS`.
pub fn format_datetime(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => epoch_ms.to_string(),
    }
}
