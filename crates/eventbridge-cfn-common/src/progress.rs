//! Progress events
//!
//! Every handler invocation produces exactly one [`ProgressEvent`]. An
//! `InProgress` event carries the callback context the orchestrator must hand
//! back verbatim on the next invocation, after at least the requested delay.

use crate::HandlerErrorCode;
use serde::{Deserialize, Serialize};

/// Outcome status of one invocation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    InProgress,
    Success,
    Failed,
}

/// The externally observable result of one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent<M, C> {
    pub status: OperationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HandlerErrorCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<C>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_delay_seconds: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<M>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_models: Option<Vec<M>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl<M, C> ProgressEvent<M, C> {
    fn empty(status: OperationStatus) -> Self {
        Self {
            status,
            error_code: None,
            message: None,
            callback_context: None,
            callback_delay_seconds: None,
            resource_model: None,
            resource_models: None,
            next_token: None,
        }
    }

    /// Terminal success carrying the final model
    pub fn success(model: M) -> Self {
        Self {
            resource_model: Some(model),
            ..Self::empty(OperationStatus::Success)
        }
    }

    /// Terminal success without a model (delete)
    pub fn success_without_model() -> Self {
        Self::empty(OperationStatus::Success)
    }

    /// One page of a list operation
    pub fn listed(models: Vec<M>, next_token: Option<String>) -> Self {
        Self {
            resource_models: Some(models),
            next_token,
            ..Self::empty(OperationStatus::Success)
        }
    }

    /// Suspension: call again after `delay_seconds` with `context`
    pub fn in_progress(model: M, context: C, delay_seconds: u64) -> Self {
        Self {
            resource_model: Some(model),
            callback_context: Some(context),
            callback_delay_seconds: Some(delay_seconds),
            ..Self::empty(OperationStatus::InProgress)
        }
    }

    /// Terminal failure
    pub fn failed(code: HandlerErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code: Some(code),
            message: Some(message.into()),
            ..Self::empty(OperationStatus::Failed)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OperationStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == OperationStatus::Failed
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == OperationStatus::InProgress
    }

    /// Drop the model from a successful event (delete returns no model)
    pub fn without_model(mut self) -> Self {
        if self.is_success() {
            self.resource_model = None;
        }
        self
    }
}
