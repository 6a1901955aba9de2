//! Step descriptors
//!
//! A step is data: a name, an optional condition, the work to do, and an
//! optional stabilization poll. The [`Chain`](super::Chain) loop interprets
//! a list of them.
//!
//! Work is a fold over `(model, state)`: a step receives both by value and
//! returns the next pair, so a failed or throttled step leaves the caller's
//! copies untouched.

use super::stabilize::{Stabilization, StabilizationPolicy};
use crate::aws::error::{ServiceError, TranslateError};
use eventbridge_cfn_common::HandlerErrorCode;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::future::Future;
use std::rc::Rc;
use thiserror::Error;

/// Why a step could not complete
#[derive(Debug, Error)]
pub enum StepFailure {
    /// The model could not be turned into a request
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// The service call failed; classified by the engine
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The step decided the chain cannot continue
    #[error("{message}")]
    Terminal {
        code: HandlerErrorCode,
        message: String,
    },
}

impl StepFailure {
    pub fn terminal(code: HandlerErrorCode, message: impl Into<String>) -> Self {
        Self::Terminal {
            code,
            message: message.into(),
        }
    }
}

pub type StepResult<M, S> = Result<(M, S), StepFailure>;

type Condition<'a, M, S> = Box<dyn Fn(&M, &S) -> bool + 'a>;
type Work<'a, M, S> = Box<dyn Fn(M, S) -> LocalBoxFuture<'a, StepResult<M, S>> + 'a>;
type Poll<'a, M, S> =
    Box<dyn Fn(&M, &S, u32) -> LocalBoxFuture<'a, Result<Stabilization, StepFailure>> + 'a>;

pub(crate) struct Stabilizer<'a, M, S> {
    pub(crate) policy: StabilizationPolicy,
    pub(crate) poll: Poll<'a, M, S>,
}

pub struct Step<'a, M, S> {
    pub(crate) name: &'static str,
    condition: Option<Condition<'a, M, S>>,
    pub(crate) work: Work<'a, M, S>,
    pub(crate) stabilizer: Option<Stabilizer<'a, M, S>>,
}

impl<'a, M: 'a, S: 'a> Step<'a, M, S> {
    /// A step with arbitrary async work
    pub fn new<F, Fut>(name: &'static str, work: F) -> Self
    where
        F: Fn(M, S) -> Fut + 'a,
        Fut: Future<Output = StepResult<M, S>> + 'a,
    {
        Self {
            name,
            condition: None,
            work: Box::new(move |model, state| work(model, state).boxed_local()),
            stabilizer: None,
        }
    }

    /// A step that never calls the service
    pub fn local<F>(name: &'static str, work: F) -> Self
    where
        F: Fn(M, S) -> StepResult<M, S> + 'a,
    {
        Self::new(name, move |model, state| {
            futures::future::ready(work(model, state))
        })
    }

    /// Translate, call, then fold the response into the model and state.
    ///
    /// A translation failure skips the call entirely.
    pub fn call<Req, Resp, T, C, CFut, D>(
        name: &'static str,
        translate: T,
        call: C,
        done: D,
    ) -> Self
    where
        Req: 'a,
        Resp: 'a,
        T: Fn(&M, &S) -> Result<Req, TranslateError> + 'a,
        C: Fn(Req) -> CFut + 'a,
        CFut: Future<Output = Result<Resp, ServiceError>> + 'a,
        D: Fn(Resp, M, S) -> StepResult<M, S> + 'a,
    {
        let done = Rc::new(done);
        Self::new(name, move |model, state| {
            let pending = translate(&model, &state).map(&call);
            let done = Rc::clone(&done);
            async move {
                let response: Resp = pending?.await?;
                (*done)(response, model, state)
            }
        })
    }

    /// Run only when `condition` holds; otherwise the step is a no-op
    pub fn when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&M, &S) -> bool + 'a,
    {
        self.condition = Some(Box::new(condition));
        self
    }

    /// Poll after a successful call until converged or the policy times out
    pub fn stabilize<P, PFut>(mut self, policy: StabilizationPolicy, poll: P) -> Self
    where
        P: Fn(&M, &S, u32) -> PFut + 'a,
        PFut: Future<Output = Result<Stabilization, StepFailure>> + 'a,
    {
        self.stabilizer = Some(Stabilizer {
            policy,
            poll: Box::new(move |model: &M, state: &S, polls: u32| {
                poll(model, state, polls).boxed_local()
            }),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn applies(&self, model: &M, state: &S) -> bool {
        self.condition
            .as_ref()
            .is_none_or(|condition| condition(model, state))
    }
}
