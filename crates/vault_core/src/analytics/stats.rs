//! Vault statistics.

use crate::model::record::Record;

/// Aggregate view of the record set.
///
/// Optional fields are `None` when the vault is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultStatistics {
    pub total_records: usize,
    /// First record name with the maximum character count.
    pub longest_name: Option<String>,
    pub longest_name_length: usize,
    pub earliest_created_at: Option<i64>,
    pub latest_created_at: Option<i64>,
    /// Most recent `updated_at` across all records.
    pub last_modified: Option<i64>,
}

/// Computes statistics in one pass over `records`.
pub fn compute_statistics(records: &[Record]) -> VaultStatistics {
    let mut stats = VaultStatistics {
        total_records: records.len(),
        ..VaultStatistics::default()
    };

    for record in records {
        let name_length = record.name.chars().count();
        // Strict comparison: ties keep the earlier record.
        if stats.longest_name.is_none() || name_length > stats.longest_name_length {
            stats.longest_name = Some(record.name.clone());
            stats.longest_name_length = name_length;
        }

        stats.earliest_created_at = Some(
            stats
                .earliest_created_at
                .map_or(record.created_at, |current| current.min(record.created_at)),
        );
        stats.latest_created_at = Some(
            stats
                .latest_created_at
                .map_or(record.created_at, |current| current.max(record.created_at)),
        );
        stats.last_modified = Some(
            stats
                .last_modified
                .map_or(record.updated_at, |current| current.max(record.updated_at)),
        );
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::{compute_statistics, VaultStatistics};
    use crate::model::record::Record;
    use uuid::Uuid;

    fn record(name: &str, created_at: i64, updated_at: i64) -> Record {
        Record {
            id: Uuid::new_v4(),
            name: name.to_string(),
            value: "v".to_string(),
            created_at,
            updated_at,
        }
    }

    #[test]
    fn empty_vault_has_no_optional_fields() {
        assert_eq!(compute_statistics(&[]), VaultStatistics::default());
    }

    #[test]
    fn longest_name_tie_keeps_first_occurrence() {
        let records = vec![
            record("beta", 30, 30),
            record("alpha", 10, 50),
            record("gamma", 20, 20),
        ];

        let stats = compute_statistics(&records);

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.longest_name.as_deref(), Some("alpha"));
        assert_eq!(stats.longest_name_length, 5);
        assert_eq!(stats.earliest_created_at, Some(10));
        assert_eq!(stats.latest_created_at, Some(30));
        assert_eq!(stats.last_modified, Some(50));
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let records = vec![record("ééé", 1, 1), record("abcd", 2, 2)];
        let stats = compute_statistics(&records);
        assert_eq!(stats.longest_name.as_deref(), Some("abcd"));
        assert_eq!(stats.longest_name_length, 4);
    }
}
