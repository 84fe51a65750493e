//! Saved objects related to an action execution, such as the rule that
//! scheduled it.
//!
//! These arrive from untrusted task or HTTP payloads, so they are validated
//! as a whole: one bad entry drops the entire list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedSavedObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
}

impl RelatedSavedObject {
    pub fn new(object_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: None,
            id: id.into(),
            object_type: object_type.into(),
            type_id: None,
        }
    }

    #[must_use]
    pub fn with_type_id(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum RelatedSavedObjectsError {
    #[error("expected an array of related saved objects")]
    NotAnArray,
    #[error("[{index}]: {source}")]
    InvalidEntry {
        index: usize,
        source: serde_json::Error,
    },
    #[error("[{index}.{field}]: value must not be empty")]
    EmptyField { index: usize, field: &'static str },
}

/// Validate a related saved objects payload.
///
/// `null` is an empty list. Anything invalid is logged and treated as an
/// empty list.
pub fn validated_related_saved_objects(data: &serde_json::Value) -> Vec<RelatedSavedObject> {
    match parse_related_saved_objects(data) {
        Ok(objects) => objects,
        Err(error) => {
            tracing::warn!("related_saved_objects ignored, invalid payload: {error}");
            Vec::new()
        }
    }
}

/// Strict form of [`validated_related_saved_objects`] that reports why a
/// payload was rejected.
pub fn parse_related_saved_objects(
    data: &serde_json::Value,
) -> Result<Vec<RelatedSavedObject>, RelatedSavedObjectsError> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    let entries = data.as_array().ok_or(RelatedSavedObjectsError::NotAnArray)?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let object: RelatedSavedObject = serde_json::from_value(entry.clone())
                .map_err(|source| RelatedSavedObjectsError::InvalidEntry { index, source })?;
            if object.id.is_empty() {
                return Err(RelatedSavedObjectsError::EmptyField { index, field: "id" });
            }
            if object.object_type.is_empty() {
                return Err(RelatedSavedObjectsError::EmptyField { index, field: "type" });
            }
            if object.type_id.as_deref() == Some("") {
                return Err(RelatedSavedObjectsError::EmptyField {
                    index,
                    field: "typeId",
                });
            }
            if object.namespace.as_deref() == Some("") {
                return Err(RelatedSavedObjectsError::EmptyField {
                    index,
                    field: "namespace",
                });
            }
            Ok(object)
        })
        .collect()
}
