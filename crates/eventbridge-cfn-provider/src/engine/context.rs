//! Callback context carried between invocations

use serde::{Deserialize, Serialize};

/// Which half of a step the cursor points at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Call,
    Stabilize,
}

/// Engine position inside a chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub step: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub polls: u32,
}

impl Cursor {
    /// Move to the next step, naming it so a resume can be checked
    pub(crate) fn advance(&mut self, next: Option<&str>) {
        *self = Self {
            step: self.step + 1,
            step_name: next.map(str::to_string),
            ..Self::default()
        };
    }

    pub(crate) fn begin_stabilizing(&mut self, name: &str) {
        self.step_name = Some(name.to_string());
        self.phase = Phase::Stabilize;
        self.polls = 0;
    }
}

/// Everything the orchestrator hands back on re-invocation.
///
/// Nothing here refers to process-local state, so any process can resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackContext<S> {
    #[serde(default)]
    pub cursor: Cursor,
    pub state: S,
}

impl<S> CallbackContext<S> {
    pub fn new(state: S) -> Self {
        Self {
            cursor: Cursor::default(),
            state,
        }
    }
}
