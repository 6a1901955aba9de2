//! Caller account identity

use serde::{Deserialize, Serialize};

/// Strongly-typed AWS account ID (12-digit string)
///
/// The orchestrator supplies the caller's account with every request. The
/// identifier resolver compares it against ARNs to decide whether an event bus
/// is local or cross-account.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::Deref,
)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(account: impl Into<String>) -> Self {
        AccountId(account.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
