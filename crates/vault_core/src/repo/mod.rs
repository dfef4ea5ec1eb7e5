//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes reject empty name/value before persistence.
//! - Not-found lookups are `Ok(None)`; errors are reserved for validation,
//!   transport and corrupted data.

pub mod record_repo;
