//! Error types for the todo API client and the view state store.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the detail view distinguishes
//! "the item does not exist" from "the server returned an unexpected status."
//! All other non-2xx responses land in `Status` with the raw status code and
//! body for debugging. `Network` is produced by the host when the request
//! could not be sent or the response could not be read.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent or the response could not be received.
    #[error("network error: {0}")]
    Network(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A required field was missing from a payload.
    #[error("invalid payload: {0}")]
    Validation(String),
}

/// Errors returned by `ViewStateStore` update operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("page size must be positive")]
    InvalidPageSize,

    #[error("unknown column: {0}")]
    UnknownColumn(String),
}
