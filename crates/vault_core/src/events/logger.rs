//! Listener that writes record events to the structured log.

use super::{ListenerError, RecordEvent, RecordListener};
use log::info;

/// Logs every lifecycle event at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl RecordListener for LoggingListener {
    fn listener_id(&self) -> &str {
        "logger"
    }

    fn on_event(&self, event: &RecordEvent) -> Result<(), ListenerError> {
        let record = event.record();
        info!(
            "event={} module=events status=ok record_id={} name_chars={}",
            event.name(),
            record.id,
            record.name.chars().count()
        );
        Ok(())
    }
}
