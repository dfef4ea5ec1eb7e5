use chrono::{TimeZone, Utc};
use std::fs;
use uuid::Uuid;
use vault_core::{load_snapshot, Record, SnapshotError, SnapshotWriter};

fn sample_records() -> Vec<Record> {
    vec![
        Record {
            id: Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap(),
            name: "alpha".to_string(),
            value: "1".to_string(),
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
        },
        Record {
            id: Uuid::parse_str("66666666-7777-4888-9999-aaaaaaaaaaaa").unwrap(),
            name: "beta".to_string(),
            value: "2".to_string(),
            created_at: 1_700_000_100_000,
            updated_at: 1_700_000_200_000,
        },
    ]
}

#[test]
fn snapshot_creates_directory_and_uses_timestamped_name() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SnapshotWriter::new(dir.path().join("nested").join("backups"));
    let taken_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap();

    let path = writer.create_snapshot_at(&sample_records(), taken_at).unwrap();

    assert_eq!(
        path,
        dir.path()
            .join("nested")
            .join("backups")
            .join("backup_2024-05-01_10-20-30.json")
    );
    assert_eq!(load_snapshot(&path).unwrap(), sample_records());
}

#[test]
fn snapshot_content_is_pretty_printed_with_two_space_indent() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SnapshotWriter::new(dir.path());

    let path = writer.create_snapshot(&sample_records()).unwrap();
    let content = fs::read_to_string(path).unwrap();

    assert!(content.starts_with("[\n  {\n    \"id\": \"11111111-2222-4333-8444-555555555555\",\n"));
    assert!(content.contains("    \"created_at\": 1700000000000,\n"));
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
}

#[test]
fn same_second_snapshots_never_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SnapshotWriter::new(dir.path());
    let taken_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap();
    let records = sample_records();

    let first = writer.create_snapshot_at(&records[..1], taken_at).unwrap();
    let second = writer.create_snapshot_at(&records, taken_at).unwrap();
    let third = writer.create_snapshot_at(&[], taken_at).unwrap();

    assert!(first.ends_with("backup_2024-05-01_10-20-30.json"));
    assert!(second.ends_with("backup_2024-05-01_10-20-30_1.json"));
    assert!(third.ends_with("backup_2024-05-01_10-20-30_2.json"));
    assert_eq!(load_snapshot(&first).unwrap(), records[..1].to_vec());
    assert_eq!(load_snapshot(&second).unwrap(), records);
    assert!(load_snapshot(&third).unwrap().is_empty());
}

#[test]
fn list_snapshots_sorts_oldest_first_and_ignores_other_files() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SnapshotWriter::new(dir.path());
    let later = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
    let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

    writer.create_snapshot_at(&[], later).unwrap();
    writer.create_snapshot_at(&[], earlier).unwrap();
    writer.create_snapshot_at(&[], earlier).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    fs::write(dir.path().join("backup_manual.json"), "[]").unwrap();

    let listed = writer.list_snapshots().unwrap();
    let keys: Vec<_> = listed
        .iter()
        .map(|entry| (entry.timestamp.as_str(), entry.sequence))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("2024-05-01_00-00-00", 0),
            ("2024-05-01_00-00-00", 1),
            ("2024-05-02_00-00-00", 0),
        ]
    );
}

#[test]
fn list_snapshots_of_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SnapshotWriter::new(dir.path().join("never-created"));
    assert!(writer.list_snapshots().unwrap().is_empty());
}

#[test]
fn load_snapshot_reports_malformed_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup_2024-05-01_00-00-00.json");
    fs::write(&path, "{not json").unwrap();

    assert!(matches!(
        load_snapshot(&path),
        Err(SnapshotError::Parse { .. })
    ));
    assert!(matches!(
        load_snapshot(dir.path().join("absent.json")),
        Err(SnapshotError::Io { .. })
    ));
}
