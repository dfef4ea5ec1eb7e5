//! Fixed-layout text export of all records.
//!
//! The export file is overwritten on every call; there is no append mode.

use super::{format_date, format_datetime};
use crate::model::record::Record;
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const RULE: &str = "========================================";

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Renders the export report for `records` in the given order.
pub fn render_export(records: &[Record], exported_at: DateTime<Utc>, file_name: &str) -> String {
    let mut content = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut content, records, exported_at, file_name);
    content
}

fn write_report(
    out: &mut impl fmt::Write,
    records: &[Record],
    exported_at: DateTime<Utc>,
    file_name: &str,
) -> fmt::Result {
    writeln!(out, "{RULE}")?;
    writeln!(out, "VAULT DATA EXPORT")?;
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "Export Date/Time: {}",
        format_datetime(exported_at.timestamp_millis())
    )?;
    writeln!(out, "Total Records: {}", records.len())?;
    writeln!(out, "File Name: {file_name}")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;

    if records.is_empty() {
        return writeln!(out, "No records found.");
    }

    for (index, record) in records.iter().enumerate() {
        writeln!(out, "Record {}:", index + 1)?;
        writeln!(out, "  ID: {}", record.id)?;
        writeln!(out, "  Name: {}", record.name)?;
        writeln!(out, "  Value: {}", record.value)?;
        writeln!(out, "  Created: {}", format_date(record.created_at))?;
        writeln!(out)?;
    }
    Ok(())
}

/// Renders and writes the export to `path`, replacing any previous file.
pub fn write_export(
    records: &[Record],
    path: impl AsRef<Path>,
    exported_at: DateTime<Utc>,
) -> ExportResult<PathBuf> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("export.txt");

    let content = render_export(records, exported_at, file_name);
    fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "event=export_write module=analytics status=ok records={} path={}",
        records.len(),
        path.display()
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{render_export, write_report};
    use crate::model::record::Record;
    use chrono::{TimeZone, Utc};
    use std::fmt;
    use uuid::Uuid;

    /// Accepts `budget` bytes, then fails every write.
    struct LimitedSink {
        written: String,
        budget: usize,
    }

    impl fmt::Write for LimitedSink {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if self.written.len() + s.len() > self.budget {
                return Err(fmt::Error);
            }
            self.written.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn empty_export_reports_no_records() {
        let exported_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let content = render_export(&[], exported_at, "export.txt");

        assert!(content.starts_with("========================================\nVAULT DATA EXPORT\n"));
        assert!(content.contains("Export Date/Time: 2024-01-02 03:04:05\n"));
        assert!(content.contains("Total Records: 0\n"));
        assert!(content.contains("File Name: export.txt\n"));
        assert!(content.ends_with("========================================\n\nNo records found.\n"));
    }

    #[test]
    fn records_are_numbered_in_given_order_with_day_precision() {
        let exported_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let created_at = Utc
            .with_ymd_and_hms(2023, 12, 31, 23, 59, 59)
            .unwrap()
            .timestamp_millis();
        let first = Record {
            id: Uuid::new_v4(),
            name: "alpha".to_string(),
            value: "1".to_string(),
            created_at,
            updated_at: created_at,
        };
        let second = Record {
            name: "beta".to_string(),
            value: "2".to_string(),
            id: Uuid::new_v4(),
            ..first.clone()
        };

        let content = render_export(&[first.clone(), second], exported_at, "export.txt");

        let expected_first = format!(
            "Record 1:\n  ID: {}\n  Name: alpha\n  Value: 1\n  Created: 2023-12-31\n\n",
            first.id
        );
        assert!(content.contains(&expected_first));
        assert!(content.contains("Record 2:\n"));
        assert!(content.find("Name: alpha") < content.find("Name: beta"));
        assert!(content.contains("Total Records: 2\n"));
    }

    #[test]
    fn write_failure_stops_the_report() {
        let exported_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut sink = LimitedSink {
            written: String::new(),
            budget: 60,
        };

        assert!(write_report(&mut sink, &[], exported_at, "export.txt").is_err());
        assert!(sink.written.starts_with("========================================\n"));
        assert!(!sink.written.contains("No records found."));
    }
}
