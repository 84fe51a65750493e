//! Event logger trait: where built records go once assembled.

use anyhow::Result;

use super::schema::Event;
use super::timing::now_timestamp;

/// Append-only sink for event-log records.
///
/// Implementations own the write semantics; the record builder never calls
/// a logger itself.
pub trait EventLogger: Send + Sync {
    /// Hand a finished record to the sink.
    fn log_event(&self, event: Event) -> Result<()>;

    /// The name of this logger implementation.
    fn name(&self) -> &str;
}

/// Fill `@timestamp` with the current time when the record has none.
pub fn stamp_missing_timestamp(event: &mut Event) {
    if event.timestamp.is_none() {
        event.timestamp = Some(now_timestamp());
    }
}
