//! Domain model for vault records.
//!
//! # Responsibility
//! - Define the canonical record shape used by repository, service,
//!   analytics and snapshot code.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `RecordId`.
//! - Deletion is permanent; there are no tombstones.

pub mod record;
