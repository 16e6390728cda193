// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::context::Env;
use debrief_adapters::{FixedConfig, MemAudit, MemNotify, MemSearch, MemStore, ReportStore};
use debrief_core::{
    ApprovalChain, ApprovalStep, Clock, FakeClock, OrgId, PositionId, ReportId, ReportState,
    StepId, StepKind,
};

type TestEnv = Env<MemSearch, MemStore, MemNotify, MemAudit, FixedConfig, FakeClock>;

fn test_env(clock: &FakeClock) -> TestEnv {
    let store = MemStore::new();
    Env {
        search: MemSearch::new(store.clone()),
        store,
        notify: MemNotify::new(),
        audit: MemAudit::new(),
        config: FixedConfig::new(48, 24),
        clock: clock.clone(),
    }
}

fn one_step_planning_chain() -> Vec<ApprovalStep> {
    vec![ApprovalStep {
        id: StepId::from("plan-1"),
        kind: StepKind::Planning,
        owner_org: OrgId::from("org"),
        next_step: None,
        approvers: vec![PositionId::from("reviewer")],
    }]
}

/// A planned report pending approval on a one-step chain, engagement
/// date `hours_ahead` hours in the future
async fn pending_planned_report(
    env: &TestEnv,
    clock: &FakeClock,
    id: &str,
    hours_ahead: i64,
) -> Report {
    let report = Report::new(
        ReportId::from(id),
        OrgId::from("org"),
        clock.now() + chrono::Duration::hours(hours_ahead),
        clock.now(),
    )
    .with_authors(vec![PositionId::from("author")]);
    env.store.insert_report(report.clone());

    let chain = ApprovalChain::order(one_step_planning_chain());
    let t = machine::submit(&report, &chain, clock).unwrap();
    env.store.apply(&report, &t).await.unwrap();
    t.report
}

#[tokio::test]
async fn demotes_a_passed_report_and_notifies_its_authors() {
    let clock = FakeClock::new();
    let env = test_env(&clock);
    let t0 = clock.now();
    pending_planned_report(&env, &clock, "r-1", 2).await;

    clock.advance(chrono::Duration::hours(3));
    let worker = EngagementDateReconciliationWorker::new(env.clone());
    let summary = worker.tick(clock.now(), Some(t0)).await.unwrap();

    assert_eq!(summary.transitioned, 1);
    let demoted = env.store.get(&ReportId::from("r-1")).await.unwrap();
    assert_eq!(demoted.state, ReportState::Draft);
    assert!(demoted.current_step.is_none());

    let calls = env.notify.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].action,
        NotifyAction::EngagementPassed {
            report: ReportId::from("r-1"),
        }
    );
    assert_eq!(calls[0].recipients, vec![PositionId::from("author")]);

    // The outstanding planning entry was stamped, not orphaned
    let history = env.store.history(&ReportId::from("r-1")).await.unwrap();
    assert!(history.outstanding().is_none());
}

#[tokio::test]
async fn reports_outside_the_window_are_not_candidates() {
    let clock = FakeClock::new();
    let env = test_env(&clock);
    let t0 = clock.now();
    pending_planned_report(&env, &clock, "r-1", 10).await;

    // Engagement date is still ahead of the window end
    clock.advance(chrono::Duration::hours(3));
    let worker = EngagementDateReconciliationWorker::new(env.clone());
    let summary = worker.tick(clock.now(), Some(t0)).await.unwrap();

    assert_eq!(summary.candidates, 0);
    assert_eq!(
        env.store.get(&ReportId::from("r-1")).await.unwrap().state,
        ReportState::PendingApproval
    );
}

#[tokio::test]
async fn resubmitted_report_is_not_demoted_again() {
    let clock = FakeClock::new();
    let env = test_env(&clock);
    let t0 = clock.now();
    let pending = pending_planned_report(&env, &clock, "r-1", 2).await;

    // Fully approve the planned report ahead of its engagement
    let chain = ApprovalChain::order(one_step_planning_chain());
    let history = env.store.history(&pending.id).await.unwrap();
    let t = machine::approve(
        &pending,
        &history,
        &chain,
        Some(&PositionId::from("reviewer")),
        &StepId::from("plan-1"),
        &clock,
    )
    .unwrap();
    env.store.apply(&pending, &t).await.unwrap();
    assert_eq!(t.report.state, ReportState::Approved);

    // First pass catches the passed engagement date and demotes
    clock.advance(chrono::Duration::hours(3));
    let worker = EngagementDateReconciliationWorker::new(env.clone());
    worker.tick(clock.now(), Some(t0)).await.unwrap();
    let first_run = clock.now();
    let demoted = env.store.get(&ReportId::from("r-1")).await.unwrap();
    assert_eq!(demoted.state, ReportState::Draft);

    // The author fills the report in and resubmits
    let chain = ApprovalChain::order(one_step_planning_chain());
    let t = machine::submit(&demoted, &chain, &clock).unwrap();
    env.store.apply(&demoted, &t).await.unwrap();
    assert_eq!(t.report.state, ReportState::PendingApproval);

    // Next pass starts its window at the previous run, which is
    // already past the engagement date
    clock.advance(chrono::Duration::hours(1));
    let summary = worker.tick(clock.now(), Some(first_run)).await.unwrap();

    assert_eq!(summary.candidates, 0);
    assert_eq!(
        env.store.get(&ReportId::from("r-1")).await.unwrap().state,
        ReportState::PendingApproval
    );
}

#[tokio::test]
async fn first_run_looks_back_a_bounded_distance() {
    let clock = FakeClock::new();
    let env = test_env(&clock);

    // One report passed 30 hours ago, one 2 hours ago. Both were
    // submitted long before their engagement dates.
    pending_planned_report(&env, &clock, "stale", 1).await;
    pending_planned_report(&env, &clock, "fresh", 29).await;
    clock.advance(chrono::Duration::hours(31));

    let worker = EngagementDateReconciliationWorker::new(env.clone());
    let summary = worker.tick(clock.now(), None).await.unwrap();

    assert_eq!(summary.candidates, 1);
    assert_eq!(
        env.store.get(&ReportId::from("fresh")).await.unwrap().state,
        ReportState::Draft
    );
    assert_eq!(
        env.store.get(&ReportId::from("stale")).await.unwrap().state,
        ReportState::PendingApproval
    );
}

#[tokio::test]
async fn notify_failure_fails_the_item_without_demoting() {
    let clock = FakeClock::new();
    let env = test_env(&clock);
    let t0 = clock.now();
    pending_planned_report(&env, &clock, "r-1", 2).await;
    env.notify.set_fail(true);

    clock.advance(chrono::Duration::hours(3));
    let worker = EngagementDateReconciliationWorker::new(env.clone());
    let summary = worker.tick(clock.now(), Some(t0)).await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(
        env.store.get(&ReportId::from("r-1")).await.unwrap().state,
        ReportState::PendingApproval
    );

    // The window is replayed once notifications recover
    env.notify.set_fail(false);
    let summary = worker.tick(clock.now(), Some(t0)).await.unwrap();
    assert_eq!(summary.transitioned, 1);
    assert_eq!(
        env.store.get(&ReportId::from("r-1")).await.unwrap().state,
        ReportState::Draft
    );
}
