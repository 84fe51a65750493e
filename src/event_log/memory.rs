//! In-memory event logger.

use anyhow::Result;
use parking_lot::Mutex;

use super::schema::Event;
use super::traits::{stamp_missing_timestamp, EventLogger};

/// Buffers records in a `parking_lot::Mutex<Vec<Event>>`.
pub struct InMemoryEventLogger {
    events: Mutex<Vec<Event>>,
    stamp_timestamp: bool,
}

impl InMemoryEventLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            stamp_timestamp: true,
        }
    }

    /// Keep records exactly as logged, without filling `@timestamp`.
    pub fn without_timestamp_stamping() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            stamp_timestamp: false,
        }
    }

    /// Snapshot of everything logged so far, oldest first.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Take all buffered records, leaving the buffer empty.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Default for InMemoryEventLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLogger for InMemoryEventLogger {
    fn log_event(&self, mut event: Event) -> Result<()> {
        if self.stamp_timestamp {
            stamp_missing_timestamp(&mut event);
        }
        self.events.lock().push(event);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_action(action: &str) -> Event {
        let mut event = Event::default();
        event.event.action = action.to_string();
        event
    }

    #[test]
    fn log_and_read_back_in_order() {
        let logger = InMemoryEventLogger::new();
        logger.log_event(event_with_action("execute-start")).unwrap();
        logger.log_event(event_with_action("execute")).unwrap();

        let actions: Vec<String> = logger.events().into_iter().map(|e| e.event.action).collect();
        assert_eq!(actions, vec!["execute-start", "execute"]);
    }

    #[test]
    fn missing_timestamp_is_stamped() {
        let logger = InMemoryEventLogger::new();
        logger.log_event(event_with_action("execute")).unwrap();
        assert!(logger.events()[0].timestamp.is_some());
    }

    #[test]
    fn existing_timestamp_is_kept() {
        let logger = InMemoryEventLogger::new();
        let mut event = event_with_action("execute");
        event.timestamp = Some("2020-01-01T00:00:00.000Z".into());
        logger.log_event(event).unwrap();
        assert_eq!(
            logger.events()[0].timestamp.as_deref(),
            Some("2020-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn stamping_can_be_disabled() {
        let logger = InMemoryEventLogger::without_timestamp_stamping();
        logger.log_event(event_with_action("execute")).unwrap();
        assert!(logger.events()[0].timestamp.is_none());
    }

    #[test]
    fn drain_empties_buffer() {
        let logger = InMemoryEventLogger::new();
        logger.log_event(event_with_action("execute")).unwrap();
        assert_eq!(logger.drain().len(), 1);
        assert!(logger.is_empty());
        assert_eq!(logger.name(), "memory");
    }
}
