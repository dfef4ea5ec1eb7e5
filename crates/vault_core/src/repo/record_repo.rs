//! Record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the canonical `records` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate name/value before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - A successful update strictly advances `updated_at`.
//! - Missing ids are reported as `Ok(None)`, never as errors.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::record::{now_epoch_ms, validate_fields, Record, RecordId, RecordValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RECORD_COLUMNS: &str = "id, name, value, created_at, updated_at";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
    /// Connection was not bootstrapped through `open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for record CRUD operations.
pub trait RecordRepository {
    /// Persists a new record; the store assigns id and timestamps.
    fn create_record(&self, name: &str, value: &str) -> RepoResult<Record>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>>;
    /// Lists every record in insertion order.
    fn list_records(&self) -> RepoResult<Vec<Record>>;
    /// Replaces name/value. Returns `None` when `id` is unknown.
    fn update_record(&self, id: RecordId, name: &str, value: &str) -> RepoResult<Option<Record>>;
    /// Removes one record permanently. Returns `None` when `id` is unknown.
    fn delete_record(&self, id: RecordId) -> RepoResult<Option<Record>>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_record(&self, name: &str, value: &str) -> RepoResult<Record> {
        validate_fields(name, value)?;

        let now = now_epoch_ms();
        let record = Record {
            id: Uuid::new_v4(),
            name: name.to_string(),
            value: value.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO records (id, name, value, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.id.to_string(),
                record.name.as_str(),
                record.value.as_str(),
                record.created_at,
                record.updated_at,
            ],
        )?;

        Ok(record)
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn list_records(&self) -> RepoResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {RECORD_COLUMNS} FROM records ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn update_record(&self, id: RecordId, name: &str, value: &str) -> RepoResult<Option<Record>> {
        validate_fields(name, value)?;

        // updated_at must move forward even within one clock millisecond.
        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE records
                     SET
                        name = ?2,
                        value = ?3,
                        updated_at = MAX(?4, updated_at + 1)
                     WHERE id = ?1
                     RETURNING {RECORD_COLUMNS};"
                ),
                params![id.to_string(), name, value, now_epoch_ms()],
                |row| Ok(parse_record_row(row)),
            )
            .optional()?;

        updated.transpose()
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let deleted = self
            .conn
            .query_row(
                &format!("DELETE FROM records WHERE id = ?1 RETURNING {RECORD_COLUMNS};"),
                [id.to_string()],
                |row| Ok(parse_record_row(row)),
            )
            .optional()?;

        deleted.transpose()
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in records.id"))
    })?;

    let record = Record {
        id,
        name: row.get("name")?,
        value: row.get("value")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    record
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("record {id_text}: {err}")))?;
    Ok(record)
}
