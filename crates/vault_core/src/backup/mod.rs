//! Point-in-time JSON snapshots of the full record set.
//!
//! # Responsibility
//! - Write timestamped recovery snapshots after mutating operations.
//! - Enumerate and load existing snapshots for recovery inspection.
//!
//! # See also
//! - `service::vault_service` for when snapshots are triggered.

pub mod snapshot;
