//! Response decoding: the JSON/XML union every operation returns.

use std::fmt;

use crate::error::{Error, Result};
use crate::xml::{self, XmlDocument};

/// Wire format requested from the service via the `format` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// JSON bodies (the default).
    #[default]
    Json,
    /// XML bodies under the `<Raven>` envelope.
    Xml,
}

impl Format {
    /// The value transmitted in the `format` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded response, in exactly the shape the service sent.
///
/// List operations (`domains`, `keywords`, `competitors`, the type
/// catalogs) decode to JSON arrays; keyed results (`rank`,
/// `profile_info`, the link-mutation receipts) decode to objects. No
/// normalization is applied on top of the wire shape. XML-format
/// clients receive the parsed `<Raven>` document instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Decoded JSON value.
    Json(serde_json::Value),
    /// Parsed XML document.
    Xml(XmlDocument),
}

impl ApiResponse {
    /// Borrow the JSON value, if this response was decoded from JSON.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Xml(_) => None,
        }
    }

    /// Consume into the JSON value, if this response was decoded from
    /// JSON.
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Xml(_) => None,
        }
    }

    /// Borrow the XML document, if this response was decoded from XML.
    pub fn as_xml(&self) -> Option<&XmlDocument> {
        match self {
            ApiResponse::Json(_) => None,
            ApiResponse::Xml(doc) => Some(doc),
        }
    }

    /// Consume into the XML document, if this response was decoded from
    /// XML.
    pub fn into_xml(self) -> Option<XmlDocument> {
        match self {
            ApiResponse::Json(_) => None,
            ApiResponse::Xml(doc) => Some(doc),
        }
    }
}

/// Decode a raw body in the requested format.
///
/// Empty and whitespace-only bodies are [`Error::EmptyResponse`]: the
/// service signals a failed request that way rather than with a
/// structured error payload. Bodies that do not parse in the requested
/// format are [`Error::MalformedResponse`].
pub fn decode(body: &str, format: Format) -> Result<ApiResponse> {
    if body.trim().is_empty() {
        return Err(Error::EmptyResponse);
    }
    match format {
        Format::Json => serde_json::from_str(body)
            .map(ApiResponse::Json)
            .map_err(|e| Error::MalformedResponse {
                format,
                message: e.to_string(),
            }),
        Format::Xml => xml::parse(body).map(ApiResponse::Xml),
    }
}
