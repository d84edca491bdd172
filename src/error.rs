//! Error types for the Raven Tools client.

use thiserror::Error;

use crate::response::Format;

/// Result type for Raven Tools operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Raven Tools client.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied argument was missing, empty, or unusable.
    ///
    /// Raised by the operation methods before a request is built; no
    /// network activity has taken place.
    #[error("invalid `{argument}` argument for `{operation}`: {reason}")]
    InvalidArgument {
        /// The client method that rejected the argument.
        operation: &'static str,
        /// The offending parameter name.
        argument: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The requested name is not in the method registry.
    #[error("`{operation}` was not recognized as a valid method")]
    UnknownOperation {
        /// The unrecognized name.
        operation: String,
    },

    /// A field the resolved operation requires was absent or empty when
    /// the request was serialized.
    #[error("the `{field}` field was not set as part of this request (required by the `{operation}` method)")]
    MissingRequiredField {
        /// The wire name of the operation.
        operation: &'static str,
        /// The missing field.
        field: &'static str,
    },

    /// A link-mutation payload was neither a list of records nor a
    /// decodable JSON array.
    #[error("invalid link payload: {reason}")]
    InvalidPayload {
        /// Why the payload was rejected.
        reason: String,
    },

    /// The HTTP exchange failed, or the service answered with a
    /// non-success status.
    #[error("transport error ({code}): {message}")]
    Transport {
        /// HTTP status code, or 0 when no response was received.
        code: u16,
        /// Human-readable description; carries the response body when
        /// the service answered with an error status.
        message: String,
    },

    /// The service answered with a success status and an empty body,
    /// which it uses to signal a failed request.
    #[error("the request returned an empty response")]
    EmptyResponse,

    /// The body could not be parsed in the requested format.
    #[error("malformed {format} response: {message}")]
    MalformedResponse {
        /// The format the response was requested in.
        format: Format,
        /// Parser diagnostic.
        message: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
