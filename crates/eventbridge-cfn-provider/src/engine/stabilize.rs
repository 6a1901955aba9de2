//! Stabilization policies
//!
//! A stabilization poll reads the resource after a mutating call and reports
//! one of three outcomes. The schedule that governs how often to poll, and for
//! how long, is a constant-interval backoff built with `backon`.

use backon::{BackoffBuilder, ConstantBuilder};
use eventbridge_cfn_common::ResourceKind;
use std::collections::BTreeSet;
use std::time::Duration;

/// Result of one stabilization poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stabilization {
    /// The mutation has taken effect
    Converged,
    /// Not there yet, poll again after the policy delay
    Pending,
    /// The resource moved somewhere it will never come back from
    Diverged(String),
}

/// Polling schedule for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilizationPolicy {
    delay: Duration,
    timeout: Duration,
}

impl StabilizationPolicy {
    pub const fn new(delay: Duration, timeout: Duration) -> Self {
        Self { delay, timeout }
    }

    /// The configured schedule for a resource type
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self::new(
            Duration::from_secs(kind.poll_delay_secs()),
            Duration::from_secs(kind.stabilization_timeout_secs()),
        )
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of pending polls tolerated before the step times out
    pub fn max_polls(&self) -> usize {
        let delay_ms = self.delay.as_millis().max(1);
        (self.timeout.as_millis() / delay_ms) as usize
    }

    /// Delay before the next poll, given how many polls already came back
    /// pending. `None` once the schedule is exhausted.
    pub fn delay_for(&self, polls: u32) -> Option<Duration> {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_polls())
            .build()
            .nth(polls as usize)
    }
}

/// What a poll concludes when the resource (or its parent) is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMissing {
    /// Gone is the goal (delete)
    Converge,
    /// Not visible yet (create, eventual consistency)
    Wait,
    /// Disappeared mid-operation
    Fail,
}

impl OnMissing {
    pub fn outcome(self) -> Stabilization {
        match self {
            Self::Converge => Stabilization::Converged,
            Self::Wait => Stabilization::Pending,
            Self::Fail => Stabilization::Diverged("resource no longer exists".to_string()),
        }
    }
}

/// Status-table policy for resources that report an enumerated status.
///
/// Statuses in neither list are divergent, so an unexpected state fails the
/// chain instead of polling until timeout.
#[derive(Debug, Clone, Copy)]
pub struct StatusPolicy {
    pub converged: &'static [&'static str],
    pub pending: &'static [&'static str],
    pub on_missing: OnMissing,
}

impl StatusPolicy {
    /// Evaluate an observed status; `None` means the resource was not found
    pub fn evaluate(&self, status: Option<&str>) -> Stabilization {
        let Some(status) = status else {
            return self.on_missing.outcome();
        };
        if self.converged.contains(&status) {
            Stabilization::Converged
        } else if self.pending.contains(&status) {
            Stabilization::Pending
        } else {
            Stabilization::Diverged(format!("reported status {status}"))
        }
    }
}

/// For mutations the service gives no completion signal for: pending once,
/// then converged.
pub fn propagation_delay(polls: u32) -> Stabilization {
    if polls == 0 {
        Stabilization::Pending
    } else {
        Stabilization::Converged
    }
}

/// Whether expected ids must show up in a listing or disappear from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Present,
    Absent,
}

/// Set-membership convergence over a listing.
///
/// `observed` is `None` when the parent resource was not found. A partial
/// match is pending, never divergent.
pub fn list_convergence(
    expected: &[String],
    observed: Option<&BTreeSet<String>>,
    membership: Membership,
    on_missing: OnMissing,
) -> Stabilization {
    let Some(observed) = observed else {
        return on_missing.outcome();
    };
    let settled = match membership {
        Membership::Present => expected.iter().all(|id| observed.contains(id)),
        Membership::Absent => expected.iter().all(|id| !observed.contains(id)),
    };
    if settled {
        Stabilization::Converged
    } else {
        Stabilization::Pending
    }
}
