//! Per-call parameter bags and request URL serialization.

use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::method::Operation;
use crate::response::Format;

/// A single field value: a scalar or an ordered list.
///
/// Lists always serialize in the repeated bracket form
/// (`field[]=a&field[]=b`), so a field name means the same thing in
/// every request that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// One value, transmitted as `field=value`.
    Scalar(String),
    /// Zero or more values, transmitted as `field[]=value` per element.
    List(Vec<String>),
}

impl FieldValue {
    /// An empty string or an empty list counts as absent.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Scalar(value) => value.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

impl<T: ToString> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.iter().map(T::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for FieldValue {
    fn from(items: &[T]) -> Self {
        FieldValue::List(items.iter().map(T::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for FieldValue {
    fn from(items: [T; N]) -> Self {
        FieldValue::List(items.iter().map(T::to_string).collect())
    }
}

/// The parameters supplied for one call, in insertion order.
///
/// A bag is built per call and never mutated by the client, so state
/// from one request cannot leak into the next. Setting a name twice
/// overwrites the earlier value. Only fields the resolved operation
/// declares are ever serialized; anything else in the bag is ignored.
///
/// ## Examples
///
/// ```rust
/// use raventools::Params;
///
/// let params = Params::new()
///     .set("domain", "www.example.com")
///     .set("engine_id", [1, 2]);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Vec<(String, FieldValue)>,
}

impl Params {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field, returning the bag for chaining.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Number of fields in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag holds no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialize the request URL for one operation call.
///
/// The query string always reads `key`, `method`, the operation's
/// required fields in contract order, its optional fields (those
/// present and non-empty), then `format`. Serialization fails with
/// [`Error::MissingRequiredField`] if any required field is absent or
/// empty, before anything touches the network.
pub fn build_url(
    endpoint: &str,
    api_key: &str,
    operation: Operation,
    params: &Params,
    format: Format,
) -> Result<String> {
    let descriptor = operation.descriptor();

    // Resolve every field up front so a half-serialized URL can never
    // escape this function.
    let mut resolved: Vec<(&'static str, &FieldValue)> =
        Vec::with_capacity(descriptor.required.len() + descriptor.optional.len());
    for &field in descriptor.required {
        match params.get(field) {
            Some(value) if !value.is_empty() => resolved.push((field, value)),
            _ => {
                return Err(Error::MissingRequiredField {
                    operation: operation.wire_name(),
                    field,
                })
            }
        }
    }
    for &field in descriptor.optional {
        if let Some(value) = params.get(field) {
            if !value.is_empty() {
                resolved.push((field, value));
            }
        }
    }

    let mut url = String::with_capacity(endpoint.len() + 64);
    url.push_str(endpoint);
    url.push_str("?key=");
    url.push_str(&encode(api_key));
    url.push_str("&method=");
    url.push_str(operation.wire_name());
    for (field, value) in resolved {
        append_field(&mut url, field, value);
    }
    url.push_str("&format=");
    url.push_str(format.as_str());

    Ok(url)
}

fn append_field(url: &mut String, field: &str, value: &FieldValue) {
    match value {
        FieldValue::Scalar(scalar) => {
            url.push('&');
            url.push_str(field);
            url.push('=');
            url.push_str(&encode(scalar));
        }
        FieldValue::List(items) => {
            for item in items {
                url.push('&');
                url.push_str(field);
                url.push_str("[]=");
                url.push_str(&encode(item));
            }
        }
    }
}

/// Form-urlencoded escaping for query values (space becomes `+`), as
/// the service expects. Field names are emitted verbatim: the bracket
/// suffix on list fields must not be escaped.
fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
