//! Event logger that forwards records into `tracing`.

use anyhow::{Context, Result};

use super::schema::Event;
use super::traits::{stamp_missing_timestamp, EventLogger};

/// Emits each record as an `info` event on the `event_log` target, with the
/// serialized record in the `record` field.
pub struct TracingEventLogger {
    stamp_timestamp: bool,
}

impl TracingEventLogger {
    pub fn new(stamp_timestamp: bool) -> Self {
        Self { stamp_timestamp }
    }
}

impl EventLogger for TracingEventLogger {
    fn log_event(&self, mut event: Event) -> Result<()> {
        if self.stamp_timestamp {
            stamp_missing_timestamp(&mut event);
        }
        let record = serde_json::to_string(&event).context("Failed to serialize event record")?;
        tracing::info!(
            target: "event_log",
            action = %event.event.action,
            action_id = %event.kibana.action.id,
            record = %record,
            "event logged"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
