//! Interactive numbered-menu shell.
//!
//! # Responsibility
//! - Present the menu, collect one line per prompt, invoke the vault
//!   service and print results.
//!
//! # Invariants
//! - Every command returns control to the menu, whatever its outcome.
//! - Only `Exit` or end of input leaves the loop.

use log::error;
use std::io::{self, BufRead, Write};
use vault_core::{
    format_date, format_datetime, Record, RecordRepository, RepoError, SnapshotReport, SortField,
    SortOrder, VaultService,
};

const MENU: &str = "
===== Record Vault =====
1. Add Record
2. List Records
3. Update Record
4. Delete Record
5. Search Records
6. Sort Records
7. Export Data
8. View Vault Statistics
9. Exit
========================
";

/// One menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    List,
    Update,
    Delete,
    Search,
    Sort,
    Export,
    Statistics,
    Exit,
}

impl MenuChoice {
    /// Parses the operator's menu answer; `None` for anything unknown.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::List),
            "3" => Some(Self::Update),
            "4" => Some(Self::Delete),
            "5" => Some(Self::Search),
            "6" => Some(Self::Sort),
            "7" => Some(Self::Export),
            "8" => Some(Self::Statistics),
            "9" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Menu loop over arbitrary line input and text output.
pub struct Shell<'svc, R: RecordRepository, I: BufRead, O: Write> {
    service: &'svc VaultService<R>,
    input: I,
    output: O,
}

impl<'svc, R: RecordRepository, I: BufRead, O: Write> Shell<'svc, R, I, O> {
    pub fn new(service: &'svc VaultService<R>, input: I, output: O) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs until `Exit` is chosen or input ends.
    ///
    /// # Errors
    /// - Only terminal I/O failures; service failures are reported inline.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            let Some(answer) = self.prompt("Choose option: ")? else {
                writeln!(self.output)?;
                return Ok(());
            };

            let keep_going = match MenuChoice::parse(&answer) {
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Exiting Record Vault...")?;
                    false
                }
                Some(choice) => self.dispatch(choice)?,
                None => {
                    writeln!(self.output, "Invalid option.")?;
                    true
                }
            };

            if !keep_going {
                return Ok(());
            }
        }
    }

    /// Returns `false` when input ended in the middle of a command.
    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<bool> {
        match choice {
            MenuChoice::Add => self.add(),
            MenuChoice::List => self.list().map(|()| true),
            MenuChoice::Update => self.update(),
            MenuChoice::Delete => self.delete(),
            MenuChoice::Search => self.search(),
            MenuChoice::Sort => self.sort(),
            MenuChoice::Export => self.export().map(|()| true),
            MenuChoice::Statistics => self.statistics().map(|()| true),
            MenuChoice::Exit => Ok(false),
        }
    }

    fn add(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("Enter name: ")? else {
            return Ok(false);
        };
        let Some(value) = self.prompt("Enter value: ")? else {
            return Ok(false);
        };

        match self.service.add(&name, &value) {
            Ok(_) => {
                writeln!(self.output, "Record added successfully!")?;
                self.report_snapshot()?;
            }
            Err(err) => self.report("adding record", &err)?,
        }
        Ok(true)
    }

    fn list(&mut self) -> io::Result<()> {
        match self.service.list() {
            Ok(records) if records.is_empty() => writeln!(self.output, "No records found.")?,
            Ok(records) => {
                for record in &records {
                    writeln!(
                        self.output,
                        "ID: {} | Name: {} | Value: {} | Created: {}",
                        record.id,
                        record.name,
                        record.value,
                        format_date(record.created_at)
                    )?;
                }
            }
            Err(err) => self.report("listing records", &err)?,
        }
        Ok(())
    }

    fn update(&mut self) -> io::Result<bool> {
        let Some(id) = self.prompt("Enter record ID to update: ")? else {
            return Ok(false);
        };
        let Some(name) = self.prompt("New name: ")? else {
            return Ok(false);
        };
        let Some(value) = self.prompt("New value: ")? else {
            return Ok(false);
        };

        match self.service.update(&id, &name, &value) {
            Ok(Some(_)) => writeln!(self.output, "Record updated!")?,
            Ok(None) => writeln!(self.output, "Record not found.")?,
            Err(err) => self.report("updating record", &err)?,
        }
        Ok(true)
    }

    fn delete(&mut self) -> io::Result<bool> {
        let Some(id) = self.prompt("Enter record ID to delete: ")? else {
            return Ok(false);
        };

        match self.service.delete(&id) {
            Ok(Some(_)) => {
                writeln!(self.output, "Record deleted!")?;
                self.report_snapshot()?;
            }
            Ok(None) => writeln!(self.output, "Record not found.")?,
            Err(err) => self.report("deleting record", &err)?,
        }
        Ok(true)
    }

    fn search(&mut self) -> io::Result<bool> {
        let Some(keyword) = self.prompt("Enter search keyword: ")? else {
            return Ok(false);
        };

        match self.service.search(&keyword) {
            Ok(records) => self.print_summaries(&records)?,
            Err(err) => self.report("searching records", &err)?,
        }
        Ok(true)
    }

    fn sort(&mut self) -> io::Result<bool> {
        let Some(field_choice) =
            self.prompt("Choose field to sort by: (1) Name, (2) Creation Date: ")?
        else {
            return Ok(false);
        };
        let Some(order_choice) = self.prompt("Choose order: (1) Ascending, (2) Descending: ")?
        else {
            return Ok(false);
        };

        let field = if field_choice.trim() == "1" {
            SortField::Name
        } else {
            SortField::Date
        };
        let order = if order_choice.trim() == "1" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };

        match self.service.sort(field, order) {
            Ok(records) if records.is_empty() => writeln!(self.output, "No records found.")?,
            Ok(records) => {
                writeln!(
                    self.output,
                    "\nSorted Records ({}, {}):",
                    field.as_str(),
                    order.as_str()
                )?;
                self.print_summaries(&records)?;
            }
            Err(err) => self.report("sorting records", &err)?,
        }
        Ok(true)
    }

    fn export(&mut self) -> io::Result<()> {
        match self.service.export_to_text() {
            Ok(path) => writeln!(
                self.output,
                "Data exported successfully to {}",
                path.display()
            )?,
            Err(err) => {
                error!("event=shell_command module=cli status=error command=export error={err}");
                writeln!(self.output, "Error exporting data: {err}")?;
            }
        }
        Ok(())
    }

    fn statistics(&mut self) -> io::Result<()> {
        let stats = match self.service.statistics() {
            Ok(stats) => stats,
            Err(err) => return self.report("getting statistics", &err),
        };

        writeln!(self.output, "\nVault Statistics:")?;
        writeln!(self.output, "--------------------------")?;
        writeln!(self.output, "Total Records: {}", stats.total_records)?;
        if let Some(last_modified) = stats.last_modified {
            writeln!(self.output, "Last Modified: {}", format_datetime(last_modified))?;
        }
        if let Some(longest_name) = &stats.longest_name {
            writeln!(
                self.output,
                "Longest Name: {} ({} characters)",
                longest_name, stats.longest_name_length
            )?;
        }
        if let Some(earliest) = stats.earliest_created_at {
            writeln!(self.output, "Earliest Record: {}", format_date(earliest))?;
        }
        if let Some(latest) = stats.latest_created_at {
            writeln!(self.output, "Latest Record: {}", format_date(latest))?;
        }
        writeln!(self.output, "--------------------------\n")?;
        Ok(())
    }

    fn print_summaries(&mut self, records: &[Record]) -> io::Result<()> {
        if records.is_empty() {
            return writeln!(self.output, "No records found.");
        }
        for record in records {
            writeln!(
                self.output,
                "ID: {} | Name: {} | Created: {}",
                record.id,
                record.name,
                format_date(record.created_at)
            )?;
        }
        Ok(())
    }

    fn report_snapshot(&mut self) -> io::Result<()> {
        match self.service.take_last_snapshot() {
            Some(SnapshotReport::Created(path)) => {
                writeln!(self.output, "Backup created at {}", path.display())
            }
            Some(SnapshotReport::Failed(err)) => writeln!(self.output, "Backup failed: {err}"),
            None => Ok(()),
        }
    }

    fn report(&mut self, action: &str, err: &RepoError) -> io::Result<()> {
        if !matches!(err, RepoError::Validation(_)) {
            error!("event=shell_command module=cli status=error action=\"{action}\" error={err}");
        }
        writeln!(self.output, "Error {action}: {err}")
    }

    /// Prints `label` and reads one line without its line terminator.
    ///
    /// Returns `None` at end of input. Invalid UTF-8 is replaced rather
    /// than rejected, so a garbled answer never ends the session.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&bytes);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}
