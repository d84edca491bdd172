//! Record types for the link-management operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One link record, as the link manager stores it.
///
/// Every field is optional on the wire: creation sends whatever is set,
/// updates and deletes key on `link_id`. Unset fields are omitted from
/// the serialized payload entirely.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Link {
    /// Remote identifier of an existing link record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_id: Option<u64>,
    /// Anchor text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    /// Destination URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_description: Option<String>,
    /// Internal notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_notes: Option<String>,
    /// URL of the linking website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    /// Website type identifier, from the website type catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_type_id: Option<u32>,
    /// Link type identifier, from the link type catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_type_id: Option<u32>,
    /// Contact person for the placement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    /// Contact email for the placement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    /// Workflow status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Tags applied to the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Payload accepted by the link-mutation operations.
///
/// Callers hand over either native records or a JSON array they
/// serialized themselves; both are validated before anything is
/// transmitted.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkBatch {
    /// Native records, serialized for the wire by the client.
    Records(Vec<Link>),
    /// A JSON array the caller already serialized.
    Raw(String),
}

impl LinkBatch {
    /// Validate the batch and produce the JSON-array string transmitted
    /// as the `link` field.
    ///
    /// Empty batches, raw strings that are not JSON, and raw JSON that
    /// is not a non-empty array are all [`Error::InvalidPayload`].
    pub fn into_field_value(self) -> Result<String> {
        match self {
            LinkBatch::Records(records) => {
                if records.is_empty() {
                    return Err(Error::InvalidPayload {
                        reason: "the batch contains no link records".into(),
                    });
                }
                serde_json::to_string(&records).map_err(|e| Error::InvalidPayload {
                    reason: e.to_string(),
                })
            }
            LinkBatch::Raw(raw) => {
                let trimmed = raw.trim();
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Array(items)) if !items.is_empty() => Ok(trimmed.to_string()),
                    Ok(Value::Array(_)) => Err(Error::InvalidPayload {
                        reason: "the JSON array contains no link records".into(),
                    }),
                    Ok(other) => Err(Error::InvalidPayload {
                        reason: format!(
                            "expected a JSON array of link records, got {}",
                            json_kind(&other)
                        ),
                    }),
                    Err(e) => Err(Error::InvalidPayload {
                        reason: format!("not decodable as JSON: {e}"),
                    }),
                }
            }
        }
    }
}

impl From<Vec<Link>> for LinkBatch {
    fn from(records: Vec<Link>) -> Self {
        LinkBatch::Records(records)
    }
}

impl From<&[Link]> for LinkBatch {
    fn from(records: &[Link]) -> Self {
        LinkBatch::Records(records.to_vec())
    }
}

impl From<Link> for LinkBatch {
    fn from(record: Link) -> Self {
        LinkBatch::Records(vec![record])
    }
}

impl From<String> for LinkBatch {
    fn from(raw: String) -> Self {
        LinkBatch::Raw(raw)
    }
}

impl From<&str> for LinkBatch {
    fn from(raw: &str) -> Self {
        LinkBatch::Raw(raw.to_string())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
