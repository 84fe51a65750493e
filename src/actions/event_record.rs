//! Builds the event-log record for one action execution.

use serde::{Deserialize, Serialize};

use super::execution_source::ActionExecutionSource;
use super::related_saved_objects::RelatedSavedObject;
use crate::event_log::schema::{
    ActionExecutionFields, ActionFields, AlertFields, AlertRuleFields, Event, EventDescriptor,
    ExecutionUuid, KibanaFields, SavedObjectEntry, TaskFields, EVENT_KIND_ACTION,
    SAVED_OBJECT_REL_PRIMARY,
};

/// Saved object type of connectors; in-memory connectors of this type are
/// flagged space agnostic.
const ACTION_SAVED_OBJECT_TYPE: &str = "action";
/// Saved object type of alerting rules.
const ALERT_SAVED_OBJECT_TYPE: &str = "alert";

/// A saved object the event is about, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSavedObject {
    #[serde(rename = "type")]
    pub object_type: String,
    pub id: String,
    pub type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

impl ActionSavedObject {
    pub fn new(
        object_type: impl Into<String>,
        id: impl Into<String>,
        type_id: impl Into<String>,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            id: id.into(),
            type_id: type_id.into(),
            relation: None,
        }
    }

    #[must_use]
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }
}

/// Task manager scheduling info for executions run as background tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_delay: Option<i64>,
}

/// Everything needed to describe one action execution.
///
/// Deserializes from the camelCase JSON the actions client passes around.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionEventLogRecordParams {
    pub action_id: String,
    pub action_type_id: String,
    pub action_execution_id: String,
    /// Event action name, e.g. `execute-start` or `execute`.
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskInfo>,
    /// Execution uuid of the rule run that scheduled this action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    #[serde(default)]
    pub saved_objects: Vec<ActionSavedObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_saved_objects: Option<Vec<RelatedSavedObject>>,
    #[serde(default)]
    pub is_in_memory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ActionExecutionSource>,
}

impl CreateActionEventLogRecordParams {
    pub fn new(
        action: impl Into<String>,
        action_id: impl Into<String>,
        action_type_id: impl Into<String>,
        action_execution_id: impl Into<String>,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            action_type_id: action_type_id.into(),
            action_execution_id: action_execution_id.into(),
            action: action.into(),
            ..Self::default()
        }
    }
}

/// Empty strings count as not provided.
fn provided(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Map execution parameters to an event-log record.
///
/// Optional inputs that were not provided leave their output fields absent.
/// Saved objects keep their input order; one `primary` entry per related
/// saved object is appended after them.
pub fn create_action_event_log_record_object(params: &CreateActionEventLogRecordParams) -> Event {
    let consumer = provided(params.consumer.as_ref());
    let rule_execution = provided(params.execution_id.as_ref()).map(|uuid| ExecutionUuid { uuid });
    let alert = if consumer.is_some() || rule_execution.is_some() {
        Some(AlertFields {
            rule: AlertRuleFields {
                consumer,
                execution: rule_execution,
                rule_type_id: None,
            },
        })
    } else {
        None
    };

    let namespace = provided(params.namespace.as_ref());
    let saved_objects = params
        .saved_objects
        .iter()
        .map(|so| SavedObjectEntry {
            rel: provided(so.relation.as_ref()),
            namespace: namespace.clone(),
            id: so.id.clone(),
            object_type: so.object_type.clone(),
            type_id: Some(so.type_id.clone()),
            space_agnostic: (so.object_type == ACTION_SAVED_OBJECT_TYPE && params.is_in_memory)
                .then_some(true),
        })
        .collect();

    let source = params
        .source
        .as_ref()
        .and_then(ActionExecutionSource::event_source_label);

    let mut event = Event {
        timestamp: provided(params.timestamp.as_ref()),
        event: EventDescriptor {
            action: params.action.clone(),
            kind: EVENT_KIND_ACTION.to_string(),
            ..EventDescriptor::default()
        },
        kibana: KibanaFields {
            alert,
            saved_objects,
            space_ids: provided(params.space_id.as_ref()).map(|space_id| vec![space_id]),
            task: params.task.as_ref().map(|task| TaskFields {
                scheduled: task.scheduled.clone(),
                schedule_delay: task.schedule_delay,
            }),
            action: ActionFields {
                name: provided(params.name.as_ref()),
                id: params.action_id.clone(),
                type_id: params.action_type_id.clone(),
                execution: ActionExecutionFields {
                    uuid: params.action_execution_id.clone(),
                    source,
                },
            },
        },
        message: provided(params.message.as_ref()),
    };

    for related in params.related_saved_objects.iter().flatten() {
        if related.object_type == ALERT_SAVED_OBJECT_TYPE {
            if let Some(rule_type_id) = provided(related.type_id.as_ref()) {
                event.kibana.alert_rule_mut().rule_type_id = Some(rule_type_id);
            }
        }
        event.kibana.saved_objects.push(SavedObjectEntry {
            rel: Some(SAVED_OBJECT_REL_PRIMARY.to_string()),
            namespace: related.namespace.clone(),
            id: related.id.clone(),
            object_type: related.object_type.clone(),
            type_id: related.type_id.clone(),
            space_agnostic: None,
        });
    }

    tracing::trace!(
        action_id = %params.action_id,
        action = %params.action,
        saved_objects = event.kibana.saved_objects.len(),
        "built action event log record"
    );
    event
}
