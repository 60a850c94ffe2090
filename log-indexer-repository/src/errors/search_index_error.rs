//! Search index error types.
//!
//! This module defines the error types that can occur during search index operations.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// The index already exists.
    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    /// Failed to create an index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to delete an index.
    #[error("Index deletion error: {0}")]
    IndexDeletionError(String),

    /// Bulk operation had failures.
    #[error("Bulk operation error: {0}")]
    BulkOperationError(String),

    /// Failed to register the index pattern with the dashboards layer.
    #[error("Registration error: {0}")]
    RegistrationError(String),

    /// Failed to serialize or parse a payload.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The search engine answered with an error status.
    ///
    /// `body` is the response body exactly as received.
    #[error("Search engine returned {status}: {body}")]
    Api {
        status: u16,
        error_type: Option<String>,
        body: String,
    },
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create an index deletion error.
    pub fn index_deletion(msg: impl Into<String>) -> Self {
        Self::IndexDeletionError(msg.into())
    }

    /// Create a bulk operation error.
    pub fn bulk_operation(msg: impl Into<String>) -> Self {
        Self::BulkOperationError(msg.into())
    }

    /// Create a registration error.
    pub fn registration(msg: impl Into<String>) -> Self {
        Self::RegistrationError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create an API error from a failed response.
    pub fn api(status: u16, error_type: Option<String>, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            error_type,
            body: body.into(),
        }
    }

    /// The raw response body, when the error came from an error response.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}
