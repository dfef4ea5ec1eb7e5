//! Record lifecycle notifications.
//!
//! # Responsibility
//! - Define lifecycle events emitted by the vault service.
//! - Fan events out to explicitly registered listeners.
//!
//! # Invariants
//! - There is no process-global channel; each service owns its dispatcher.
//! - Listeners run synchronously, in registration order.
//! - One failing listener never prevents the remaining ones from running.

mod dispatcher;
mod logger;

pub use dispatcher::{EventDispatcher, ListenerError, RecordListener};
pub use logger::LoggingListener;

use crate::model::record::Record;

/// Lifecycle event carrying the affected record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEvent {
    Added(Record),
    Updated(Record),
    Deleted(Record),
}

impl RecordEvent {
    /// Stable event name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Added(_) => "record_added",
            Self::Updated(_) => "record_updated",
            Self::Deleted(_) => "record_deleted",
        }
    }

    pub fn record(&self) -> &Record {
        match self {
            Self::Added(record) | Self::Updated(record) | Self::Deleted(record) => record,
        }
    }
}
