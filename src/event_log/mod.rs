//! Event-log records and the sinks that receive them.

pub mod memory;
pub mod schema;
pub mod timing;
pub mod tracing_sink;
pub mod traits;
pub mod writer;

pub use memory::InMemoryEventLogger;
pub use schema::{
    ActionExecutionFields, ActionFields, AlertFields, AlertRuleFields, Event, EventDescriptor,
    ExecutionUuid, KibanaFields, SavedObjectEntry, TaskFields, EVENT_KIND_ACTION,
    SAVED_OBJECT_REL_PRIMARY,
};
pub use timing::{start_timing, stop_timing};
pub use tracing_sink::TracingEventLogger;
pub use traits::EventLogger;
pub use writer::WriterEventLogger;

use crate::config::EventLogConfig;

/// Event logger sinks selectable from config.
pub const SUPPORTED_SINKS: &[&str] = &["stdout", "stderr", "log"];

/// Create the event logger named by `config.sink`.
pub fn create_event_logger(config: &EventLogConfig) -> anyhow::Result<Box<dyn EventLogger>> {
    let logger: Box<dyn EventLogger> = match config.sink.trim().to_ascii_lowercase().as_str() {
        "stdout" => Box::new(WriterEventLogger::stdout(
            config.pretty,
            config.stamp_timestamp,
        )),
        "stderr" => Box::new(WriterEventLogger::stderr(
            config.pretty,
            config.stamp_timestamp,
        )),
        "log" => Box::new(TracingEventLogger::new(config.stamp_timestamp)),
        other => anyhow::bail!(
            "unknown event_log.sink '{other}'; expected one of: {}",
            SUPPORTED_SINKS.join(", ")
        ),
    };
    tracing::debug!(sink = logger.name(), "event logger created");
    Ok(logger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_resolves_known_sinks() {
        for (sink, expected) in [("stdout", "writer"), ("STDERR", "writer"), ("log", "log")] {
            let config = EventLogConfig {
                sink: sink.into(),
                ..EventLogConfig::default()
            };
            let logger = create_event_logger(&config).unwrap();
            assert_eq!(logger.name(), expected);
        }
    }

    #[test]
    fn factory_rejects_unknown_sink() {
        let config = EventLogConfig {
            sink: "kafka".into(),
            ..EventLogConfig::default()
        };
        let err = create_event_logger(&config).err().unwrap();
        assert!(err.to_string().contains("kafka"));
    }
}
