//! What triggered an action execution.
//!
//! On the wire an execution source is `{ "type": <label>, "source": <payload> }`.
//! A `SAVED_OBJECT` label means the payload references a saved object; every
//! other label (or no label) is an inline descriptor whose payload is opaque.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Known execution source labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionExecutionSourceType {
    SavedObject,
    HttpRequest,
    Notification,
    BackgroundTask,
}

impl ActionExecutionSourceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SavedObject => "SAVED_OBJECT",
            Self::HttpRequest => "HTTP_REQUEST",
            Self::Notification => "NOTIFICATION",
            Self::BackgroundTask => "BACKGROUND_TASK",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "SAVED_OBJECT" => Some(Self::SavedObject),
            "HTTP_REQUEST" => Some(Self::HttpRequest),
            "NOTIFICATION" => Some(Self::Notification),
            "BACKGROUND_TASK" => Some(Self::BackgroundTask),
            _ => None,
        }
    }
}

impl fmt::Display for ActionExecutionSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The saved object an execution was triggered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedObjectReference {
    pub id: String,
    #[serde(rename = "type")]
    pub source_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExecutionSource", into = "RawExecutionSource")]
pub enum ActionExecutionSource {
    /// Triggered by a saved object, e.g. an alerting rule.
    SavedObject(SavedObjectReference),
    /// Triggered by something described inline (an HTTP request, a
    /// notification, a background task).
    Inline(InlineSource),
}

/// Inline execution source descriptor. Never carries the `SAVED_OBJECT`
/// label, so the variant always agrees with the wire discriminator.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineSource {
    source_type: Option<String>,
    source: Option<serde_json::Value>,
}

impl InlineSource {
    pub fn source_type(&self) -> Option<&str> {
        self.source_type.as_deref()
    }

    pub fn source(&self) -> Option<&serde_json::Value> {
        self.source.as_ref()
    }
}

#[derive(Debug, Error)]
pub enum ExecutionSourceError {
    #[error("SAVED_OBJECT execution source is missing its saved object reference")]
    MissingSavedObject,
    #[error("invalid SAVED_OBJECT execution source reference: {0}")]
    InvalidSavedObject(#[from] serde_json::Error),
    #[error("SAVED_OBJECT label requires a saved object reference, not an inline source")]
    SavedObjectLabelOnInline,
}

impl ActionExecutionSource {
    pub fn saved_object(id: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self::SavedObject(SavedObjectReference {
            id: id.into(),
            source_type: source_type.into(),
        })
    }

    pub fn http_request(request: serde_json::Value) -> Self {
        Self::inline(ActionExecutionSourceType::HttpRequest, request)
    }

    pub fn notification(source: serde_json::Value) -> Self {
        Self::inline(ActionExecutionSourceType::Notification, source)
    }

    pub fn background_task(task: serde_json::Value) -> Self {
        Self::inline(ActionExecutionSourceType::BackgroundTask, task)
    }

    /// Inline source with an arbitrary label. The `SAVED_OBJECT` label is
    /// rejected; use [`ActionExecutionSource::saved_object`] for that.
    pub fn labeled(
        label: impl Into<String>,
        source: Option<serde_json::Value>,
    ) -> Result<Self, ExecutionSourceError> {
        let label = label.into();
        if label == ActionExecutionSourceType::SavedObject.as_str() {
            return Err(ExecutionSourceError::SavedObjectLabelOnInline);
        }
        Ok(Self::Inline(InlineSource {
            source_type: Some(label),
            source,
        }))
    }

    /// Inline source with no label at all.
    pub fn unlabeled(source: Option<serde_json::Value>) -> Self {
        Self::Inline(InlineSource {
            source_type: None,
            source,
        })
    }

    fn inline(kind: ActionExecutionSourceType, source: serde_json::Value) -> Self {
        Self::Inline(InlineSource {
            source_type: Some(kind.as_str().to_string()),
            source: Some(source),
        })
    }

    /// The known label of this source, if it has one.
    pub fn source_type(&self) -> Option<ActionExecutionSourceType> {
        match self {
            Self::SavedObject(_) => Some(ActionExecutionSourceType::SavedObject),
            Self::Inline(inline) => inline
                .source_type()
                .and_then(ActionExecutionSourceType::from_label),
        }
    }

    pub fn is_saved_object(&self) -> bool {
        matches!(self, Self::SavedObject(_))
    }

    pub fn is_http_request(&self) -> bool {
        self.source_type() == Some(ActionExecutionSourceType::HttpRequest)
    }

    pub fn is_notification(&self) -> bool {
        self.source_type() == Some(ActionExecutionSourceType::Notification)
    }

    pub fn is_background_task(&self) -> bool {
        self.source_type() == Some(ActionExecutionSourceType::BackgroundTask)
    }

    /// Value recorded as `kibana.action.execution.source`.
    ///
    /// Saved-object sources report the saved object's type as declared;
    /// inline sources report their label lower-cased.
    pub fn event_source_label(&self) -> Option<String> {
        match self {
            Self::SavedObject(reference) => Some(reference.source_type.clone()),
            Self::Inline(inline) => inline.source_type().map(str::to_lowercase),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawExecutionSource {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<serde_json::Value>,
}

impl TryFrom<RawExecutionSource> for ActionExecutionSource {
    type Error = ExecutionSourceError;

    fn try_from(raw: RawExecutionSource) -> Result<Self, Self::Error> {
        if raw.source_type.as_deref() == Some(ActionExecutionSourceType::SavedObject.as_str()) {
            let payload = raw.source.ok_or(ExecutionSourceError::MissingSavedObject)?;
            let reference: SavedObjectReference = serde_json::from_value(payload)?;
            return Ok(Self::SavedObject(reference));
        }
        Ok(Self::Inline(InlineSource {
            source_type: raw.source_type,
            source: raw.source,
        }))
    }
}

impl From<ActionExecutionSource> for RawExecutionSource {
    fn from(source: ActionExecutionSource) -> Self {
        match source {
            ActionExecutionSource::SavedObject(reference) => Self {
                source_type: Some(ActionExecutionSourceType::SavedObject.as_str().to_string()),
                source: Some(serde_json::json!({
                    "id": reference.id,
                    "type": reference.source_type,
                })),
            },
            ActionExecutionSource::Inline(InlineSource {
                source_type,
                source,
            }) => Self {
                source_type,
                source,
            },
        }
    }
}
