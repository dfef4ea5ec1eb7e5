//! Record domain model.
//!
//! # Responsibility
//! - Define the persisted name/value record with identity and timestamps.
//! - Provide input validation shared by add and update paths.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused.
//! - `name` and `value` are never empty or whitespace-only.
//! - `updated_at >= created_at` at all times.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Store-assigned record identifier.
pub type RecordId = Uuid;

/// Persisted name/value record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub value: String,
    /// Unix epoch milliseconds (UTC). Immutable after creation.
    pub created_at: i64,
    /// Unix epoch milliseconds (UTC). Refreshed by every update.
    pub updated_at: i64,
}

/// Validation failures for record input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyName,
    EmptyValue,
    /// Persisted timestamps are out of order.
    TimestampOrder { created_at: i64, updated_at: i64 },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "record name cannot be empty"),
            Self::EmptyValue => write!(f, "record value cannot be empty"),
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) cannot be earlier than created_at ({created_at})"
            ),
        }
    }
}

impl Error for RecordValidationError {}

impl Record {
    /// Validates the full record, including timestamp ordering.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_fields(&self.name, &self.value)?;
        if self.updated_at < self.created_at {
            return Err(RecordValidationError::TimestampOrder {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Whether this record matches a search keyword.
    ///
    /// Name matching is case-insensitive; id matching is literal.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(&keyword.to_lowercase())
            || self.id.to_string().contains(keyword)
    }
}

/// Rejects empty or whitespace-only name/value input.
pub fn validate_fields(name: &str, value: &str) -> Result<(), RecordValidationError> {
    if name.trim().is_empty() {
        return Err(RecordValidationError::EmptyName);
    }
    if value.trim().is_empty() {
        return Err(RecordValidationError::EmptyValue);
    }
    Ok(())
}

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{validate_fields, Record, RecordValidationError};
    use uuid::Uuid;

    fn record(name: &str) -> Record {
        Record {
            id: Uuid::parse_str("0b7e2c4a-9f1d-4c3e-8a5b-6d2f1e0c9a7b").unwrap(),
            name: name.to_string(),
            value: "v".to_string(),
            created_at: 10,
            updated_at: 10,
        }
    }

    #[test]
    fn whitespace_only_fields_are_rejected() {
        assert_eq!(
            validate_fields("  \t", "value"),
            Err(RecordValidationError::EmptyName)
        );
        assert_eq!(
            validate_fields("name", "\n"),
            Err(RecordValidationError::EmptyValue)
        );
        assert!(validate_fields(" a ", " b ").is_ok());
    }

    #[test]
    fn validate_rejects_updated_before_created() {
        let mut item = record("alpha");
        item.updated_at = 5;
        assert!(matches!(
            item.validate(),
            Err(RecordValidationError::TimestampOrder { .. })
        ));
    }

    #[test]
    fn keyword_matches_name_case_insensitively_and_id_literally() {
        let item = record("Project Alpha");
        assert!(item.matches_keyword("alpha"));
        assert!(item.matches_keyword("PROJECT"));
        assert!(!item.matches_keyword("beta"));

        assert!(item.matches_keyword("0b7e2c4a"));
        assert!(!item.matches_keyword("0B7E2C4A"));
    }
}
