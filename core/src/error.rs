//! Error types for the bill API client and the bill form.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the bill does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging. Failures below HTTP (connection
//! refused, timeouts) surface as `Transport`.

use thiserror::Error;

/// Errors returned by `BillClient` parse methods and `BillApi` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// Reasons the bill form refuses input or submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("bill date must be YYYY-MM-DD, got {0:?}")]
    InvalidDate(String),
}
