//! Snapshot writer and reader.
//!
//! # Invariants
//! - Snapshot files are named `backup_<YYYY-MM-DD_HH-MM-SS>[_n].json` (UTC).
//! - An existing snapshot is never overwritten; same-second collisions get
//!   the next free sequence suffix.
//! - Content is a JSON array of records with 2-space indentation.

use crate::model::record::Record;
use chrono::{DateTime, Utc};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const MAX_SEQUENCE_SUFFIX: u32 = 9_999;

static SNAPSHOT_FILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^backup_(\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2})(?:_(\d+))?\.json$")
        .expect("valid snapshot file regex")
});

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug)]
pub enum SnapshotError {
    Io { path: PathBuf, source: io::Error },
    Serialize(serde_json::Error),
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Every sequence suffix for one second is already taken.
    SequenceExhausted { timestamp: String },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "snapshot i/o failed at `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize snapshot: {err}"),
            Self::Parse { path, source } => {
                write!(f, "invalid snapshot file `{}`: {source}", path.display())
            }
            Self::SequenceExhausted { timestamp } => {
                write!(f, "no free snapshot file name left for {timestamp}")
            }
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Parse { source, .. } => Some(source),
            Self::SequenceExhausted { .. } => None,
        }
    }
}

/// One snapshot file discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub path: PathBuf,
    /// Timestamp part of the file name (`YYYY-MM-DD_HH-MM-SS`).
    pub timestamp: String,
    /// Collision suffix; `0` for the unsuffixed file.
    pub sequence: u32,
}

/// Writes and reads snapshots inside one backup directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `records` to a new snapshot named after the current time.
    pub fn create_snapshot(&self, records: &[Record]) -> SnapshotResult<PathBuf> {
        self.create_snapshot_at(records, Utc::now())
    }

    /// Writes `records` to a new snapshot named after `taken_at`.
    ///
    /// # Side effects
    /// - Creates the backup directory when absent.
    pub fn create_snapshot_at(
        &self,
        records: &[Record],
        taken_at: DateTime<Utc>,
    ) -> SnapshotResult<PathBuf> {
        let json = serde_json::to_string_pretty(records).map_err(SnapshotError::Serialize)?;

        fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let timestamp = taken_at.format(SNAPSHOT_TIMESTAMP_FORMAT).to_string();
        for sequence in 0..=MAX_SEQUENCE_SUFFIX {
            let path = self.dir.join(snapshot_file_name(&timestamp, sequence));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(SnapshotError::Io { path, source }),
            };

            write_or_discard(&path, || {
                file.write_all(json.as_bytes())?;
                file.sync_all()
            })?;

            info!(
                "event=snapshot_create module=backup status=ok records={} path={}",
                records.len(),
                path.display()
            );
            return Ok(path);
        }

        Err(SnapshotError::SequenceExhausted { timestamp })
    }

    /// Lists snapshot files, oldest first. A missing directory is empty.
    pub fn list_snapshots(&self) -> SnapshotResult<Vec<SnapshotEntry>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SnapshotError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut snapshots = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SnapshotError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some((timestamp, sequence)) = parse_snapshot_file_name(file_name) {
                snapshots.push(SnapshotEntry {
                    path: entry.path(),
                    timestamp,
                    sequence,
                });
            }
        }

        snapshots.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then(a.sequence.cmp(&b.sequence))
        });
        Ok(snapshots)
    }
}

/// Parses a snapshot file back into records.
pub fn load_snapshot(path: impl AsRef<Path>) -> SnapshotResult<Vec<Record>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs `write` against the freshly created file at `path`. On failure the
/// partial file is removed so it is never mistaken for a snapshot.
fn write_or_discard(path: &Path, write: impl FnOnce() -> io::Result<()>) -> SnapshotResult<()> {
    write().map_err(|source| {
        if let Err(err) = fs::remove_file(path) {
            warn!(
                "event=snapshot_cleanup module=backup status=error path={} error={}",
                path.display(),
                err
            );
        }
        SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn snapshot_file_name(timestamp: &str, sequence: u32) -> String {
    if sequence == 0 {
        format!("backup_{timestamp}.json")
    } else {
        format!("backup_{timestamp}_{sequence}.json")
    }
}

fn parse_snapshot_file_name(file_name: &str) -> Option<(String, u32)> {
    let captures = SNAPSHOT_FILE_RE.captures(file_name)?;
    let timestamp = captures.get(1)?.as_str().to_string();
    let sequence = match captures.get(2) {
        Some(value) => value.as_str().parse().ok()?,
        None => 0,
    };
    Some((timestamp, sequence))
}
