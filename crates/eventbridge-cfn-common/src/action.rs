//! Lifecycle actions

use serde::{Deserialize, Serialize};

/// The lifecycle action requested by the orchestrator
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Action {
    /// Whether the action changes the external resource
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}
