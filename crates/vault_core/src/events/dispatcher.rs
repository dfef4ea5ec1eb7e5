//! In-process listener registry for record events.

use super::RecordEvent;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure reported by one listener while handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerError {
    pub message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ListenerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ListenerError {}

/// Passive observer of record lifecycle events.
pub trait RecordListener {
    /// Short identifier used in diagnostics.
    fn listener_id(&self) -> &str;
    fn on_event(&self, event: &RecordEvent) -> Result<(), ListenerError>;
}

/// Ordered registry of record listeners.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn RecordListener>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one listener; it runs after every previously registered one.
    pub fn register(&mut self, listener: Arc<dyn RecordListener>) {
        debug!(
            "event=listener_register module=events status=ok listener={} position={}",
            listener.listener_id(),
            self.listeners.len()
        );
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers `event` to every listener before returning.
    ///
    /// Returns the number of listeners that failed. Failures are logged and
    /// delivery continues with the next listener.
    pub fn publish(&self, event: &RecordEvent) -> usize {
        let mut failed = 0;
        for listener in &self.listeners {
            if let Err(err) = listener.on_event(event) {
                failed += 1;
                warn!(
                    "event=listener_failed module=events status=error listener={} record_event={} record_id={} error={}",
                    listener.listener_id(),
                    event.name(),
                    event.record().id,
                    err
                );
            }
        }
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::{EventDispatcher, ListenerError, RecordListener};
    use crate::events::RecordEvent;
    use crate::model::record::Record;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    struct Recording {
        id: &'static str,
        fail: bool,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl RecordListener for Recording {
        fn listener_id(&self) -> &str {
            self.id
        }

        fn on_event(&self, event: &RecordEvent) -> Result<(), ListenerError> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.id, event.name()));
            if self.fail {
                return Err(ListenerError::new("boom"));
            }
            Ok(())
        }
    }

    fn sample_event() -> RecordEvent {
        RecordEvent::Added(Record {
            id: Uuid::new_v4(),
            name: "alpha".to_string(),
            value: "1".to_string(),
            created_at: 1,
            updated_at: 1,
        })
    }

    #[test]
    fn publish_runs_listeners_in_registration_order_and_survives_failures() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        for (id, fail) in [("first", false), ("broken", true), ("last", false)] {
            dispatcher.register(Arc::new(Recording {
                id,
                fail,
                seen: Arc::clone(&seen),
            }));
        }

        let failed = dispatcher.publish(&sample_event());

        assert_eq!(failed, 1);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "first:record_added".to_string(),
                "broken:record_added".to_string(),
                "last:record_added".to_string(),
            ]
        );
    }

    #[test]
    fn empty_dispatcher_publishes_without_failures() {
        let dispatcher = EventDispatcher::new();
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.publish(&sample_event()), 0);
    }
}
