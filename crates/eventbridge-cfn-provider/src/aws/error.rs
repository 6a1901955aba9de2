//! EventBridge error types and handler error classification
//!
//! SDK failures are converted once, at the client boundary, into
//! [`ServiceError`] using the `.code()` from `ProvideErrorMetadata`. The
//! classifier then maps a `ServiceError` onto the fixed handler taxonomy with
//! an ordered first-match-wins table.

use aws_sdk_eventbridge::error::{
    BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError,
};
use eventbridge_cfn_common::HandlerErrorCode;
use thiserror::Error;

/// Error code EventBridge embeds in generic service errors when rate limited
pub const THROTTLING_ERROR_CODE: &str = "ThrottlingException";

/// Failure of a single EventBridge call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The resource (or its parent) does not exist
    #[error("Resource not found: {message}")]
    ResourceNotFound { message: String },

    /// A resource with this name already exists
    #[error("Resource already exists: {message}")]
    ResourceAlreadyExists { message: String },

    /// Another request is modifying the same resource
    #[error("Concurrent modification: {message}")]
    ConcurrentModification { message: String },

    /// An account quota was hit
    #[error("Limit exceeded: {message}")]
    LimitExceeded { message: String },

    /// The event pattern (or other input document) is malformed
    #[error("Invalid event pattern: {message}")]
    InvalidEventPattern { message: String },

    /// EventBridge reported an internal failure
    #[error("Internal service error: {message}")]
    Internal { message: String },

    /// Any other service error, with the embedded error code if one was sent
    #[error("EventBridge error ({}): {message}", .code.as_deref().unwrap_or("no error code"))]
    Service {
        code: Option<String>,
        message: String,
    },
}

impl ServiceError {
    /// Build a typed error from an EventBridge error code.
    pub fn from_code(code: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Some("ResourceNotFoundException") => Self::ResourceNotFound { message },
            Some("ResourceAlreadyExistsException") => Self::ResourceAlreadyExists { message },
            Some("ConcurrentModificationException") => Self::ConcurrentModification { message },
            Some("LimitExceededException") => Self::LimitExceeded { message },
            Some("InvalidEventPatternException") => Self::InvalidEventPattern { message },
            Some("InternalException") => Self::Internal { message },
            _ => Self::Service {
                code: code.map(str::to_string),
                message,
            },
        }
    }

    /// Convert any SDK operation error.
    ///
    /// Errors without metadata (timeouts, dispatch failures) carry no code and
    /// fall through to the generic variant.
    pub fn from_sdk<E, R>(error: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        let message = error
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| DisplayErrorContext(&error).to_string());
        Self::from_code(error.code(), message)
    }

    /// Convenience for tests and fakes
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            message: message.into(),
        }
    }

    /// Convenience for tests and fakes
    pub fn throttled() -> Self {
        Self::Service {
            code: Some(THROTTLING_ERROR_CODE.to_string()),
            message: "Rate exceeded".to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

/// A service request could not be built from the resource model
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid request: {0}")]
    Build(#[from] BuildError),

    #[error("{field} is not a valid JSON document: {source}")]
    Document {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

type Classification = (fn(&ServiceError) -> bool, HandlerErrorCode);

fn is_conflict(error: &ServiceError) -> bool {
    matches!(error, ServiceError::ConcurrentModification { .. })
}

fn is_limit_exceeded(error: &ServiceError) -> bool {
    matches!(error, ServiceError::LimitExceeded { .. })
}

fn is_invalid_input(error: &ServiceError) -> bool {
    matches!(error, ServiceError::InvalidEventPattern { .. })
}

fn is_internal(error: &ServiceError) -> bool {
    matches!(error, ServiceError::Internal { .. })
}

fn is_not_found(error: &ServiceError) -> bool {
    matches!(error, ServiceError::ResourceNotFound { .. })
}

fn is_already_exists(error: &ServiceError) -> bool {
    matches!(error, ServiceError::ResourceAlreadyExists { .. })
}

/// Only the generic family is checked for the throttling code. A missing code
/// (null error details) never matches.
fn is_throttling(error: &ServiceError) -> bool {
    matches!(
        error,
        ServiceError::Service { code: Some(code), .. } if code == THROTTLING_ERROR_CODE
    )
}

/// Evaluated in order, first match wins
const CLASSIFICATION: &[Classification] = &[
    (is_conflict, HandlerErrorCode::Conflict),
    (is_limit_exceeded, HandlerErrorCode::ServiceLimitExceeded),
    (is_invalid_input, HandlerErrorCode::InvalidRequest),
    (is_internal, HandlerErrorCode::InternalFailure),
    (is_not_found, HandlerErrorCode::NotFound),
    (is_already_exists, HandlerErrorCode::AlreadyExists),
    (is_throttling, HandlerErrorCode::Throttling),
];

/// Map a service error onto the handler error taxonomy.
pub fn classify(error: &ServiceError) -> HandlerErrorCode {
    CLASSIFICATION
        .iter()
        .find(|(matches, _)| matches(error))
        .map(|(_, code)| *code)
        .unwrap_or(HandlerErrorCode::GeneralServiceException)
}
