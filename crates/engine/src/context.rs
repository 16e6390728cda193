// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator bundle and shared transition plumbing for the workers

use crate::error::EngineError;
use crate::runner::ItemOutcome;
use debrief_adapters::{
    Applied, AuditAdapter, ConfigAdapter, NotifyAdapter, ReportStore, SearchAdapter,
};
use debrief_core::{ApprovalChain, Clock, Effect, Report, StepId, Transition};

/// Everything a worker needs, injected at construction.
///
/// Bundling the collaborators behind one trait keeps worker signatures
/// readable while preserving explicit dependency injection; there is
/// no ambient engine singleton to reach for.
pub trait Collaborators: Clone + Send + Sync + 'static {
    type Search: SearchAdapter;
    type Store: ReportStore;
    type Notify: NotifyAdapter;
    type Audit: AuditAdapter;
    type Config: ConfigAdapter;
    type Clk: Clock + 'static;

    fn search(&self) -> Self::Search;
    fn store(&self) -> Self::Store;
    fn notify(&self) -> Self::Notify;
    fn audit(&self) -> Self::Audit;
    fn config(&self) -> Self::Config;
    fn clock(&self) -> Self::Clk;
}

/// Plain-struct collaborator bundle
#[derive(Clone)]
pub struct Env<S, R, N, A, C, K> {
    pub search: S,
    pub store: R,
    pub notify: N,
    pub audit: A,
    pub config: C,
    pub clock: K,
}

impl<S, R, N, A, C, K> Collaborators for Env<S, R, N, A, C, K>
where
    S: SearchAdapter,
    R: ReportStore,
    N: NotifyAdapter,
    A: AuditAdapter,
    C: ConfigAdapter,
    K: Clock + 'static,
{
    type Search = S;
    type Store = R;
    type Notify = N;
    type Audit = A;
    type Config = C;
    type Clk = K;

    fn search(&self) -> S {
        self.search.clone()
    }
    fn store(&self) -> R {
        self.store.clone()
    }
    fn notify(&self) -> N {
        self.notify.clone()
    }
    fn audit(&self) -> A {
        self.audit.clone()
    }
    fn config(&self) -> C {
        self.config.clone()
    }
    fn clock(&self) -> K {
        self.clock.clone()
    }
}

/// Resolve the approval chain the report's current step belongs to.
///
/// The step's own kind decides which chain applies, never the wall
/// clock: a report mid-way through its planning chain stays gated by
/// that chain even if the engagement date passes before the
/// reconciliation worker gets to it.
pub(crate) async fn resolve_chain<E: Collaborators>(
    env: &E,
    report: &Report,
    step_id: &StepId,
) -> Result<ApprovalChain, EngineError> {
    let Some(step) = env.store().step(step_id).await? else {
        return Err(EngineError::inconsistency(
            &report.id,
            format!("current step {step_id} does not exist"),
        ));
    };
    let steps = env
        .store()
        .approval_steps(&report.owner_org, step.kind)
        .await?;
    Ok(ApprovalChain::order(steps))
}

/// Commit a transition and dispatch its effects.
///
/// A stale apply means another tick already handled this report; that
/// is informational, not an error, and the effects are dropped with it.
pub(crate) async fn commit<E: Collaborators>(
    env: &E,
    expected: &Report,
    transition: &Transition,
) -> Result<ItemOutcome, EngineError> {
    if transition.is_noop() {
        return Ok(ItemOutcome::Skipped);
    }
    match env.store().apply(expected, transition).await? {
        Applied::Committed => {
            dispatch_effects(env, &transition.effects).await;
            Ok(ItemOutcome::Transitioned)
        }
        Applied::Stale => {
            tracing::info!(report = %expected.id, "transition lost the race, already handled");
            Ok(ItemOutcome::Skipped)
        }
    }
}

/// Send out a committed transition's audit lines and notifications.
/// Notification failures are logged and swallowed: the transition has
/// already landed and delivery is fire-and-forget.
pub(crate) async fn dispatch_effects<E: Collaborators>(env: &E, effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::Audit { message } => env.audit().record(message.clone()).await,
            Effect::Notify { action, recipients } => {
                if let Err(e) = env.notify().notify(action.clone(), recipients).await {
                    tracing::warn!(error = %e, "notification failed");
                }
            }
        }
    }
}
