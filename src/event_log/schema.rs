//! Event-log record shape for action executions.
//!
//! Every optional field is elided from the serialized JSON when unset, so a
//! record never carries `null` placeholders for fields that were not
//! triggered.

use serde::{Deserialize, Serialize};

/// Relation tag for a saved object that is the primary subject of an event.
pub const SAVED_OBJECT_REL_PRIMARY: &str = "primary";

/// `event.kind` for every action execution record.
pub const EVENT_KIND_ACTION: &str = "action";

/// A single event-log record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    #[serde(rename = "@timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub event: EventDescriptor,
    pub kibana: KibanaFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The `event` block: what happened and, once timed, when.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventDescriptor {
    pub action: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Nanoseconds between `start` and `end`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

/// Platform-specific fields under the `kibana` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KibanaFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertFields>,
    #[serde(default)]
    pub saved_objects: Vec<SavedObjectEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskFields>,
    pub action: ActionFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertFields {
    pub rule: AlertRuleFields,
}

/// `kibana.alert.rule`: the rule an action execution was triggered for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertRuleFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionUuid {
    pub uuid: String,
}

/// One entry of `kibana.saved_objects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedObjectEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_agnostic: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_delay: Option<i64>,
}

/// `kibana.action`: the connector that ran.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub id: String,
    pub type_id: String,
    pub execution: ActionExecutionFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionExecutionFields {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl KibanaFields {
    /// `kibana.alert.rule`, created empty if the record has none yet.
    pub fn alert_rule_mut(&mut self) -> &mut AlertRuleFields {
        &mut self.alert.get_or_insert_with(AlertFields::default).rule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_event() -> Event {
        Event {
            timestamp: None,
            event: EventDescriptor {
                action: "execute".into(),
                kind: EVENT_KIND_ACTION.into(),
                ..EventDescriptor::default()
            },
            kibana: KibanaFields {
                action: ActionFields {
                    name: None,
                    id: "1".into(),
                    type_id: ".email".into(),
                    execution: ActionExecutionFields {
                        uuid: "exec-1".into(),
                        source: None,
                    },
                },
                ..KibanaFields::default()
            },
            message: None,
        }
    }

    #[test]
    fn unset_fields_are_absent_from_json() {
        let value = serde_json::to_value(minimal_event()).unwrap();
        assert_eq!(
            value,
            json!({
                "event": { "action": "execute", "kind": "action" },
                "kibana": {
                    "saved_objects": [],
                    "action": {
                        "id": "1",
                        "type_id": ".email",
                        "execution": { "uuid": "exec-1" }
                    }
                }
            })
        );
    }

    #[test]
    fn timestamp_serializes_under_at_key() {
        let mut event = minimal_event();
        event.timestamp = Some("2024-01-01T00:00:00.000Z".into());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["@timestamp"], "2024-01-01T00:00:00.000Z");
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn saved_object_type_uses_type_key() {
        let entry = SavedObjectEntry {
            id: "so-1".into(),
            object_type: "action".into(),
            ..SavedObjectEntry::default()
        };
        assert_eq!(
            serde_json::to_value(entry).unwrap(),
            json!({ "id": "so-1", "type": "action" })
        );
    }

    #[test]
    fn alert_rule_mut_creates_block_once() {
        let mut event = minimal_event();
        event.kibana.alert_rule_mut().consumer = Some("alerts".into());
        event.kibana.alert_rule_mut().rule_type_id = Some("rt".into());
        let rule = &event.kibana.alert.as_ref().unwrap().rule;
        assert_eq!(rule.consumer.as_deref(), Some("alerts"));
        assert_eq!(rule.rule_type_id.as_deref(), Some("rt"));
    }

    #[test]
    fn record_parses_back_from_json() {
        let raw = json!({
            "@timestamp": "2024-01-01T00:00:00.000Z",
            "event": { "action": "execute", "kind": "action" },
            "kibana": {
                "action": { "id": "1", "type_id": ".email", "execution": { "uuid": "e" } }
            },
            "message": "ok"
        });
        let event: Event = serde_json::from_value(raw).unwrap();
        assert!(event.kibana.saved_objects.is_empty());
        assert_eq!(event.message.as_deref(), Some("ok"));
    }
}
