//! Core domain logic for the record vault.
//! This crate is the single source of truth for record invariants.

pub mod analytics;
pub mod backup;
pub mod config;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analytics::export::{render_export, write_export, ExportError, ExportResult};
pub use analytics::stats::{compute_statistics, VaultStatistics};
pub use analytics::{format_date, format_datetime};
pub use backup::snapshot::{
    load_snapshot, SnapshotEntry, SnapshotError, SnapshotResult, SnapshotWriter,
};
pub use config::{ConfigError, VaultConfig};
pub use events::{EventDispatcher, ListenerError, LoggingListener, RecordEvent, RecordListener};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{Record, RecordId, RecordValidationError};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use service::sort::{locale_compare, sort_records, SortField, SortOrder, SortParseError};
pub use service::vault_service::{SnapshotReport, VaultError, VaultService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
