//! Progress-chain engine
//!
//! A [`Chain`] is an ordered list of [`Step`]s run by a single loop. Each
//! invocation resumes at the [`Cursor`] carried in the callback context and
//! runs until the chain finishes, fails, or has to suspend:
//!
//! - a stabilization poll reports pending: suspend with the policy delay,
//!   resume by polling again (never by repeating the call)
//! - the service throttles: suspend with no delay and the model, state and
//!   cursor exactly as they were before the step, so the resumed attempt is
//!   the same request
//!
//! Suspension is a returned `InProgress` event. Waiting and re-invoking is the
//! orchestrator's job.

pub mod context;
pub mod stabilize;
pub mod step;

pub use context::{CallbackContext, Cursor, Phase};
pub use stabilize::{
    Membership, OnMissing, Stabilization, StabilizationPolicy, StatusPolicy, list_convergence,
    propagation_delay,
};
pub use step::{Step, StepFailure, StepResult};

use crate::aws::error::classify;
use eventbridge_cfn_common::{HandlerErrorCode, ProgressEvent, ResourceKind};
use tracing::{debug, info, warn};

/// The event a chain produces for one invocation
pub type ChainEvent<M, S> = ProgressEvent<M, CallbackContext<S>>;

/// One lifecycle action for one resource, as a list of steps
pub struct Chain<'a, M, S> {
    kind: ResourceKind,
    identifier: String,
    steps: Vec<Step<'a, M, S>>,
}

impl<'a, M: Clone + 'a, S: Clone + 'a> Chain<'a, M, S> {
    pub fn new(
        kind: ResourceKind,
        identifier: impl Into<String>,
        steps: Vec<Step<'a, M, S>>,
    ) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
            steps,
        }
    }

    #[cfg(test)]
    fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(Step::name).collect()
    }

    fn name_at(&self, index: usize) -> Option<&'static str> {
        self.steps.get(index).map(Step::name)
    }

    /// Run from the context's cursor until success, failure or suspension.
    pub async fn run(&self, model: M, context: CallbackContext<S>) -> ChainEvent<M, S> {
        let CallbackContext {
            mut cursor,
            mut state,
        } = context;
        let mut model = model;

        if let Err(message) = self.check_cursor(&cursor) {
            warn!(
                kind = %self.kind,
                id = %self.identifier,
                step = cursor.step,
                "Rejecting callback context: {message}"
            );
            return ProgressEvent::failed(HandlerErrorCode::InternalFailure, message);
        }

        while let Some(step) = self.steps.get(cursor.step) {
            if cursor.phase == Phase::Call {
                if !step.applies(&model, &state) {
                    debug!(kind = %self.kind, step = step.name, "Skipping step");
                    cursor.advance(self.name_at(cursor.step + 1));
                    continue;
                }

                debug!(kind = %self.kind, id = %self.identifier, step = step.name, "Running step");
                match (step.work)(model.clone(), state.clone()).await {
                    Ok((next_model, next_state)) => {
                        model = next_model;
                        state = next_state;
                    }
                    Err(failure) => {
                        let context = CallbackContext { cursor, state };
                        return self.interrupted(step.name, failure, model, context);
                    }
                }

                if step.stabilizer.is_none() {
                    cursor.advance(self.name_at(cursor.step + 1));
                    continue;
                }
                cursor.begin_stabilizing(step.name);
            }

            let Some(stabilizer) = &step.stabilizer else {
                return ProgressEvent::failed(
                    HandlerErrorCode::InternalFailure,
                    format!("{} step {} has nothing to stabilize", self.kind, step.name),
                );
            };

            match (stabilizer.poll)(&model, &state, cursor.polls).await {
                Ok(Stabilization::Converged) => {
                    info!(
                        kind = %self.kind,
                        id = %self.identifier,
                        step = step.name,
                        polls = cursor.polls,
                        "Stabilized"
                    );
                    cursor.advance(self.name_at(cursor.step + 1));
                }
                Ok(Stabilization::Pending) => {
                    let Some(delay) = stabilizer.policy.delay_for(cursor.polls) else {
                        warn!(
                            kind = %self.kind,
                            id = %self.identifier,
                            step = step.name,
                            "Stabilization timed out"
                        );
                        return ProgressEvent::failed(
                            HandlerErrorCode::GeneralServiceException,
                            format!(
                                "{} [{}] did not stabilize after {} polls ({}s)",
                                self.kind,
                                self.identifier,
                                cursor.polls,
                                stabilizer.policy.timeout().as_secs()
                            ),
                        );
                    };
                    cursor.polls += 1;
                    debug!(
                        kind = %self.kind,
                        step = step.name,
                        polls = cursor.polls,
                        delay_secs = delay.as_secs(),
                        "Not stabilized yet"
                    );
                    return ProgressEvent::in_progress(
                        model,
                        CallbackContext { cursor, state },
                        delay.as_secs(),
                    );
                }
                Ok(Stabilization::Diverged(reason)) => {
                    warn!(
                        kind = %self.kind,
                        id = %self.identifier,
                        step = step.name,
                        %reason,
                        "Stabilization diverged"
                    );
                    return ProgressEvent::failed(
                        HandlerErrorCode::GeneralServiceException,
                        format!("{} [{}] {reason}", self.kind, self.identifier),
                    );
                }
                Err(failure) => {
                    let context = CallbackContext { cursor, state };
                    return self.interrupted(step.name, failure, model, context);
                }
            }
        }

        info!(kind = %self.kind, id = %self.identifier, "Chain complete");
        ProgressEvent::success(model)
    }

    fn check_cursor(&self, cursor: &Cursor) -> Result<(), String> {
        if cursor.step > self.steps.len() {
            return Err(format!(
                "callback context points at step {} of a {}-step chain",
                cursor.step,
                self.steps.len()
            ));
        }
        let expected = self.name_at(cursor.step);
        match (&cursor.step_name, expected) {
            (None, _) if cursor.step == 0 && cursor.phase == Phase::Call => Ok(()),
            (Some(name), Some(expected)) if name == expected => {
                let step = &self.steps[cursor.step];
                if cursor.phase == Phase::Stabilize && step.stabilizer.is_none() {
                    Err(format!("step {expected} has nothing to stabilize"))
                } else {
                    Ok(())
                }
            }
            (name, expected) => Err(format!(
                "callback context names step {:?} but step {} is {:?}",
                name, cursor.step, expected
            )),
        }
    }

    /// A step failed: throttling suspends, everything else is terminal.
    fn interrupted(
        &self,
        step: &'static str,
        failure: StepFailure,
        model: M,
        context: CallbackContext<S>,
    ) -> ChainEvent<M, S> {
        let (code, message) = match failure {
            StepFailure::Service(error) => {
                let code = classify(&error);
                if code == HandlerErrorCode::Throttling {
                    info!(kind = %self.kind, id = %self.identifier, step, "Throttled, will retry step");
                    return ProgressEvent::in_progress(model, context, 0);
                }
                warn!(
                    kind = %self.kind,
                    id = %self.identifier,
                    step,
                    code = %code,
                    error = %error,
                    "Service call failed"
                );
                (code, error.to_string())
            }
            StepFailure::Translate(error) => {
                warn!(kind = %self.kind, step, error = %error, "Could not build request");
                (HandlerErrorCode::GeneralServiceException, error.to_string())
            }
            StepFailure::Terminal { code, message } => {
                info!(kind = %self.kind, step, code = %code, "Chain stopped");
                (code, message)
            }
        };
        let message = format!("{} [{}] {step}: {message}", self.kind, self.identifier);
        ProgressEvent::failed(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::ServiceError;
    use std::cell::Cell;
    use std::time::Duration;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct Model {
        name: Option<String>,
        arn: Option<String>,
        log: Vec<String>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct State {
        created: bool,
    }

    const KIND: ResourceKind = ResourceKind::Rule;

    fn policy() -> StabilizationPolicy {
        StabilizationPolicy::new(Duration::from_secs(5), Duration::from_secs(15))
    }

    fn record<'a>(name: &'static str) -> Step<'a, Model, State> {
        Step::local(name, move |mut model: Model, state| {
            model.log.push(name.to_string());
            Ok((model, state))
        })
    }

    async fn flaky_call(calls: &Cell<u32>, fail_first: ServiceError) -> Result<String, ServiceError> {
        calls.set(calls.get() + 1);
        if calls.get() == 1 {
            Err(fail_first)
        } else {
            Ok("arn:aws:events:us-east-1:123456789012:rule/r".to_string())
        }
    }

    #[tokio::test]
    async fn runs_steps_in_order() {
        let chain = Chain::new(KIND, "r", vec![record("a"), record("b"), record("c")]);
        let event = chain.run(Model::default(), CallbackContext::default()).await;

        assert!(event.is_success());
        assert_eq!(event.resource_model.unwrap().log, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn false_condition_is_a_no_op() {
        let chain = Chain::new(
            KIND,
            "r",
            vec![
                record("a"),
                record("b").when(|model: &Model, _: &State| model.name.is_some()),
                record("c"),
            ],
        );
        let event = chain.run(Model::default(), CallbackContext::default()).await;
        assert_eq!(event.resource_model.unwrap().log, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn throttled_call_is_retried_untouched() {
        let calls = Cell::new(0);
        let before = Cell::new(0);
        let steps = vec![
            Step::local("before", |model, state| {
                before.set(before.get() + 1);
                Ok((model, state))
            }),
            Step::call(
                "put",
                |_: &Model, _: &State| Ok(()),
                |()| flaky_call(&calls, ServiceError::throttled()),
                |arn: String, mut model: Model, _: State| {
                    model.arn = Some(arn);
                    Ok((model, State { created: true }))
                },
            ),
        ];
        let chain = Chain::new(KIND, "r", steps);

        let first = chain.run(Model::default(), CallbackContext::default()).await;
        assert!(first.is_in_progress());
        assert_eq!(first.callback_delay_seconds, Some(0));
        let model = first.resource_model.unwrap();
        let context = first.callback_context.unwrap();
        assert_eq!(model.arn, None);
        assert!(!context.state.created);
        assert_eq!(context.cursor.step, 1);
        assert_eq!(context.cursor.step_name.as_deref(), Some("put"));
        assert_eq!(context.cursor.phase, Phase::Call);

        let second = chain.run(model, context).await;
        assert!(second.is_success());
        assert!(second.resource_model.unwrap().arn.is_some());
        assert_eq!(calls.get(), 2);
        assert_eq!(before.get(), 1);
    }

    #[tokio::test]
    async fn throttled_first_step_hands_back_the_same_context() {
        let calls = Cell::new(0);
        let chain = Chain::new(
            KIND,
            "r",
            vec![Step::call(
                "put",
                |_: &Model, _: &State| Ok(()),
                |()| flaky_call(&calls, ServiceError::throttled()),
                |_, model, state| Ok((model, state)),
            )],
        );

        let first = chain.run(Model::default(), CallbackContext::default()).await;
        assert!(first.is_in_progress());
        assert_eq!(first.callback_delay_seconds, Some(0));
        let context = first.callback_context.unwrap();
        assert_eq!(context, CallbackContext::default());

        let second = chain.run(first.resource_model.unwrap(), context).await;
        assert!(second.is_success());
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn throttled_poll_resumes_by_polling_only() {
        let calls = Cell::new(0);
        let polls = Cell::new(0);
        let chain = Chain::new(
            KIND,
            "r",
            vec![
                Step::local("mutate", |model, state| {
                    calls.set(calls.get() + 1);
                    Ok((model, state))
                })
                .stabilize(policy(), |_: &Model, _: &State, _| {
                    polls.set(polls.get() + 1);
                    futures::future::ready(if polls.get() == 1 {
                        Err(StepFailure::from(ServiceError::throttled()))
                    } else {
                        Ok(Stabilization::Converged)
                    })
                }),
            ],
        );

        let first = chain.run(Model::default(), CallbackContext::default()).await;
        assert!(first.is_in_progress());
        assert_eq!(first.callback_delay_seconds, Some(0));
        let context = first.callback_context.unwrap();
        assert_eq!(context.cursor.phase, Phase::Stabilize);
        assert_eq!(context.cursor.step_name.as_deref(), Some("mutate"));

        let second = chain.run(first.resource_model.unwrap(), context).await;
        assert!(second.is_success());
        assert_eq!(calls.get(), 1);
        assert_eq!(polls.get(), 2);
    }

    #[tokio::test]
    async fn classified_failure_is_terminal() {
        let calls = Cell::new(0);
        let chain = Chain::new(
            KIND,
            "r",
            vec![Step::call(
                "put",
                |_: &Model, _: &State| Ok(()),
                |()| flaky_call(&calls, ServiceError::LimitExceeded { message: "quota".into() }),
                |_, model, state| Ok((model, state)),
            )],
        );
        let event = chain.run(Model::default(), CallbackContext::default()).await;

        assert!(event.is_failed());
        assert_eq!(event.error_code, Some(HandlerErrorCode::ServiceLimitExceeded));
        let message = event.message.unwrap();
        assert!(message.contains("AWS::Events::Rule"), "{message}");
        assert!(message.contains("put"), "{message}");
    }

    #[tokio::test]
    async fn translation_failure_skips_call() {
        let calls = Cell::new(0);
        let chain = Chain::new(
            KIND,
            "r",
            vec![Step::call(
                "put",
                |_: &Model, _: &State| {
                    Err::<(), _>(crate::aws::TranslateError::MissingField("Name"))
                },
                |()| flaky_call(&calls, ServiceError::throttled()),
                |_, model, state| Ok((model, state)),
            )],
        );
        let event = chain.run(Model::default(), CallbackContext::default()).await;

        assert_eq!(event.error_code, Some(HandlerErrorCode::GeneralServiceException));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn pending_resumes_by_polling_only() {
        let calls = Cell::new(0);
        let polls_seen = Cell::new(0);
        let chain = Chain::new(
            KIND,
            "r",
            vec![
                Step::local("mutate", |model, state| {
                    calls.set(calls.get() + 1);
                    Ok((model, state))
                })
                .stabilize(policy(), |_: &Model, _: &State, polls| {
                    polls_seen.set(polls_seen.get() + 1);
                    futures::future::ready(Ok(if polls < 2 {
                        Stabilization::Pending
                    } else {
                        Stabilization::Converged
                    }))
                }),
                record("after"),
            ],
        );

        let mut event = chain.run(Model::default(), CallbackContext::default()).await;
        let mut suspensions = 0;
        while event.is_in_progress() {
            suspensions += 1;
            assert_eq!(event.callback_delay_seconds, Some(5));
            let context = event.callback_context.unwrap();
            assert_eq!(context.cursor.phase, Phase::Stabilize);
            event = chain.run(event.resource_model.unwrap(), context).await;
        }

        assert!(event.is_success());
        assert_eq!(suspensions, 2);
        assert_eq!(calls.get(), 1);
        assert_eq!(polls_seen.get(), 3);
        assert_eq!(event.resource_model.unwrap().log, vec!["after"]);
    }

    #[tokio::test]
    async fn diverged_fails_without_polling_again() {
        let chain = Chain::new(
            KIND,
            "conn",
            vec![record("mutate").stabilize(policy(), |_: &Model, _: &State, _| {
                futures::future::ready(Ok(Stabilization::Diverged(
                    "reported status DEAUTHORIZED".to_string(),
                )))
            })],
        );
        let event = chain.run(Model::default(), CallbackContext::default()).await;

        assert!(event.is_failed());
        assert_eq!(event.error_code, Some(HandlerErrorCode::GeneralServiceException));
        assert!(event.message.unwrap().contains("DEAUTHORIZED"));
    }

    #[tokio::test]
    async fn times_out_after_schedule() {
        let chain = Chain::new(
            KIND,
            "r",
            vec![record("mutate").stabilize(policy(), |_: &Model, _: &State, _| {
                futures::future::ready(Ok(Stabilization::Pending))
            })],
        );

        let mut event = chain.run(Model::default(), CallbackContext::default()).await;
        let mut suspensions = 0;
        while event.is_in_progress() {
            suspensions += 1;
            event = chain
                .run(event.resource_model.unwrap(), event.callback_context.unwrap())
                .await;
        }

        assert_eq!(suspensions, policy().max_polls());
        assert_eq!(event.error_code, Some(HandlerErrorCode::GeneralServiceException));
        assert!(event.message.unwrap().contains("did not stabilize"));
    }

    #[tokio::test]
    async fn mismatched_cursor_is_rejected() {
        let chain = Chain::new(KIND, "r", vec![record("a"), record("b")]);
        let context = CallbackContext {
            cursor: Cursor {
                step: 1,
                step_name: Some("put-targets".to_string()),
                ..Cursor::default()
            },
            state: State::default(),
        };
        let event = chain.run(Model::default(), context).await;
        assert_eq!(event.error_code, Some(HandlerErrorCode::InternalFailure));

        let context = CallbackContext {
            cursor: Cursor {
                step: 9,
                ..Cursor::default()
            },
            state: State::default(),
        };
        let event = chain.run(Model::default(), context).await;
        assert_eq!(event.error_code, Some(HandlerErrorCode::InternalFailure));
    }

    #[tokio::test]
    async fn stabilize_phase_on_plain_step_is_rejected() {
        let chain = Chain::new(KIND, "r", vec![record("a")]);
        let context = CallbackContext {
            cursor: Cursor {
                step: 0,
                step_name: Some("a".to_string()),
                phase: Phase::Stabilize,
                polls: 1,
            },
            state: State::default(),
        };
        let event = chain.run(Model::default(), context).await;
        assert_eq!(event.error_code, Some(HandlerErrorCode::InternalFailure));
    }

    #[tokio::test]
    async fn terminal_failure_keeps_its_code() {
        let chain = Chain::new(
            KIND,
            "r",
            vec![Step::local("check", |_: Model, _: State| {
                Err(StepFailure::terminal(HandlerErrorCode::AlreadyExists, "r already exists"))
            })],
        );
        let event = chain.run(Model::default(), CallbackContext::default()).await;
        assert_eq!(event.error_code, Some(HandlerErrorCode::AlreadyExists));
    }

    #[test]
    fn step_names_in_declaration_order() {
        let chain = Chain::new(KIND, "r", vec![record("a"), record("b")]);
        assert_eq!(chain.step_names(), vec!["a", "b"]);
    }
}
