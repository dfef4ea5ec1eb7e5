//! Vault use-case service.
//!
//! # Responsibility
//! - Provide add/list/update/delete/search/sort entry points for callers.
//! - Publish lifecycle events and trigger recovery snapshots.
//! - Expose statistics and the text export.
//!
//! # Invariants
//! - Add and update reject empty name/value before touching the store.
//! - Unknown or malformed ids are reported as `Ok(None)`.
//! - Add and delete each write exactly one snapshot on success.
//! - Snapshot failures are logged and never fail the triggering mutation.
//! - The outcome of the latest snapshot is kept until a caller takes it.

use crate::analytics::export::{write_export, ExportError};
use crate::analytics::stats::{compute_statistics, VaultStatistics};
use crate::backup::snapshot::{SnapshotError, SnapshotWriter};
use crate::events::{EventDispatcher, RecordEvent, RecordListener};
use crate::model::record::{validate_fields, Record, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoError, RepoResult};
use crate::service::sort::{sort_records, SortField, SortOrder};
use chrono::Utc;
use log::{info, warn};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Service error for use-cases that reach beyond the repository.
#[derive(Debug)]
pub enum VaultError {
    Repo(RepoError),
    Export(ExportError),
}

impl Display for VaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for VaultError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<RepoError> for VaultError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportError> for VaultError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Outcome of the snapshot written after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotReport {
    Created(PathBuf),
    Failed(String),
}

/// Use-case service over a record repository.
pub struct VaultService<R: RecordRepository> {
    repo: R,
    dispatcher: EventDispatcher,
    snapshots: SnapshotWriter,
    export_path: PathBuf,
    last_snapshot: RefCell<Option<SnapshotReport>>,
}

impl<R: RecordRepository> VaultService<R> {
    /// Creates a service with no listeners registered.
    pub fn new(repo: R, snapshots: SnapshotWriter, export_path: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            dispatcher: EventDispatcher::new(),
            snapshots,
            export_path: export_path.into(),
            last_snapshot: RefCell::new(None),
        }
    }

    /// Registers a lifecycle listener after all existing ones.
    pub fn register_listener(&mut self, listener: Arc<dyn RecordListener>) {
        self.dispatcher.register(listener);
    }

    pub fn snapshots(&self) -> &SnapshotWriter {
        &self.snapshots
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// Returns and clears the outcome of the most recent snapshot.
    ///
    /// `None` when no snapshot was attempted since the last call.
    pub fn take_last_snapshot(&self) -> Option<SnapshotReport> {
        self.last_snapshot.borrow_mut().take()
    }

    /// Validates and persists a new record.
    ///
    /// # Contract
    /// - Publishes `Added` and writes one snapshot of the full record set.
    /// - Returns `RepoError::Validation` for empty name/value.
    pub fn add(&self, name: &str, value: &str) -> RepoResult<Record> {
        let record = self.repo.create_record(name, value)?;
        info!(
            "event=record_add module=service status=ok record_id={}",
            record.id
        );

        self.dispatcher.publish(&RecordEvent::Added(record.clone()));
        self.snapshot_after("add");
        Ok(record)
    }

    /// Lists all records in store retrieval order.
    pub fn list(&self) -> RepoResult<Vec<Record>> {
        self.repo.list_records()
    }

    /// Gets one record by textual id.
    pub fn get(&self, id: &str) -> RepoResult<Option<Record>> {
        match parse_record_id(id) {
            Some(id) => self.repo.get_record(id),
            None => Ok(None),
        }
    }

    /// Replaces name/value of an existing record.
    ///
    /// # Contract
    /// - Validates like `add`; validation runs before the id lookup.
    /// - Returns `Ok(None)` for unknown or malformed ids.
    /// - Publishes `Updated` on success; no snapshot is written.
    pub fn update(&self, id: &str, name: &str, value: &str) -> RepoResult<Option<Record>> {
        validate_fields(name, value)?;
        let Some(id) = parse_record_id(id) else {
            return Ok(None);
        };

        let Some(record) = self.repo.update_record(id, name, value)? else {
            info!("event=record_update module=service status=not_found record_id={id}");
            return Ok(None);
        };

        info!(
            "event=record_update module=service status=ok record_id={}",
            record.id
        );
        self.dispatcher.publish(&RecordEvent::Updated(record.clone()));
        Ok(Some(record))
    }

    /// Permanently removes one record.
    ///
    /// # Contract
    /// - Returns `Ok(None)` for unknown or malformed ids; nothing changes.
    /// - Publishes `Deleted` and writes one snapshot on success.
    pub fn delete(&self, id: &str) -> RepoResult<Option<Record>> {
        let Some(id) = parse_record_id(id) else {
            return Ok(None);
        };

        let Some(record) = self.repo.delete_record(id)? else {
            info!("event=record_delete module=service status=not_found record_id={id}");
            return Ok(None);
        };

        info!(
            "event=record_delete module=service status=ok record_id={}",
            record.id
        );
        self.dispatcher.publish(&RecordEvent::Deleted(record.clone()));
        self.snapshot_after("delete");
        Ok(Some(record))
    }

    /// Returns records whose name contains `keyword` (case-insensitive) or
    /// whose id contains it literally.
    pub fn search(&self, keyword: &str) -> RepoResult<Vec<Record>> {
        let records = self.repo.list_records()?;
        Ok(records
            .into_iter()
            .filter(|record| record.matches_keyword(keyword))
            .collect())
    }

    /// Returns a sorted copy of all records.
    pub fn sort(&self, field: SortField, order: SortOrder) -> RepoResult<Vec<Record>> {
        let records = self.repo.list_records()?;
        Ok(sort_records(&records, field, order))
    }

    pub fn statistics(&self) -> RepoResult<VaultStatistics> {
        let records = self.repo.list_records()?;
        Ok(compute_statistics(&records))
    }

    /// Writes the text export, overwriting the previous one.
    pub fn export_to_text(&self) -> Result<PathBuf, VaultError> {
        let records = self.repo.list_records()?;
        let path = write_export(&records, &self.export_path, Utc::now())?;
        Ok(path)
    }

    fn snapshot_after(&self, trigger: &str) {
        let outcome = self
            .repo
            .list_records()
            .map_err(SnapshotFailure::Listing)
            .and_then(|records| {
                self.snapshots
                    .create_snapshot(&records)
                    .map_err(SnapshotFailure::Write)
            });

        let report = match outcome {
            Ok(path) => SnapshotReport::Created(path),
            Err(err) => {
                warn!(
                    "event=snapshot_create module=service status=error trigger={} backup_dir={} error={}",
                    trigger,
                    self.snapshots.dir().display(),
                    err
                );
                SnapshotReport::Failed(err.to_string())
            }
        };
        self.last_snapshot.replace(Some(report));
    }
}

enum SnapshotFailure {
    Listing(RepoError),
    Write(SnapshotError),
}

impl Display for SnapshotFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Listing(err) => write!(f, "failed to list records: {err}"),
            Self::Write(err) => write!(f, "{err}"),
        }
    }
}

fn parse_record_id(value: &str) -> Option<RecordId> {
    RecordId::parse_str(value.trim()).ok()
}
