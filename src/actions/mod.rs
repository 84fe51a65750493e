//! Action execution records: parameters, execution sources and related
//! saved objects, and the mapping to event-log records.

pub mod event_record;
pub mod execution_source;
pub mod related_saved_objects;

pub use event_record::{
    create_action_event_log_record_object, ActionSavedObject, CreateActionEventLogRecordParams,
    TaskInfo,
};
pub use execution_source::{
    ActionExecutionSource, ActionExecutionSourceType, ExecutionSourceError, InlineSource,
    SavedObjectReference,
};
pub use related_saved_objects::{
    parse_related_saved_objects, validated_related_saved_objects, RelatedSavedObject,
    RelatedSavedObjectsError,
};
