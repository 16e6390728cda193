// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;
use debrief_core::{machine, ApprovalChain, Clock, FakeClock};

fn store_with_report(clock: &FakeClock, engagement: DateTime<Utc>) -> (MemStore, Report) {
    let store = MemStore::new();
    let report = Report::new(
        ReportId::from("r-1"),
        OrgId::from("org-1"),
        engagement,
        clock.now(),
    );
    store.insert_report(report.clone());
    (store, report)
}

#[tokio::test]
async fn get_returns_inserted_report() {
    let clock = FakeClock::new();
    let (store, report) = store_with_report(&clock, clock.now());
    let loaded = store.get(&report.id).await.unwrap();
    assert_eq!(loaded, report);
}

#[tokio::test]
async fn get_unknown_report_is_not_found() {
    let store = MemStore::new();
    let err = store.get(&ReportId::from("nope")).await.unwrap_err();
    assert!(matches!(err, StoreError::ReportNotFound(_)));
}

#[tokio::test]
async fn apply_commits_report_and_history() {
    let clock = FakeClock::new();
    let (store, report) = store_with_report(&clock, clock.now() + Duration::days(1));

    let t = machine::submit(&report, &ApprovalChain::default(), &clock).unwrap();
    let applied = store.apply(&report, &t).await.unwrap();

    assert_eq!(applied, Applied::Committed);
    assert_eq!(
        store.get(&report.id).await.unwrap().state,
        ReportState::Approved
    );
    let history = store.history(&report.id).await.unwrap();
    assert_eq!(history.entries().len(), 1);
}

#[tokio::test]
async fn apply_detects_stale_transitions() {
    let clock = FakeClock::new();
    let (store, report) = store_with_report(&clock, clock.now() + Duration::days(1));

    let t = machine::submit(&report, &ApprovalChain::default(), &clock).unwrap();
    assert_eq!(store.apply(&report, &t).await.unwrap(), Applied::Committed);

    // Replaying the same transition: the stored report is Approved
    // now, no longer the Draft it was computed from
    assert_eq!(store.apply(&report, &t).await.unwrap(), Applied::Stale);
}

#[tokio::test]
async fn apply_stamps_the_completed_entry() {
    let clock = FakeClock::new();
    let (store, report) = store_with_report(&clock, clock.now() + Duration::days(1));
    let steps = vec![ApprovalStep {
        id: debrief_core::StepId::from("s-1"),
        kind: StepKind::Planning,
        owner_org: OrgId::from("org-1"),
        next_step: None,
        approvers: vec![PositionId::from("reviewer")],
    }];
    store.insert_steps(steps.clone());
    let chain = ApprovalChain::order(steps);

    let t = machine::submit(&report, &chain, &clock).unwrap();
    store.apply(&report, &t).await.unwrap();

    clock.advance(Duration::hours(2));
    let history = store.history(&report.id).await.unwrap();
    let t2 = machine::approve(
        &t.report,
        &history,
        &chain,
        None,
        &debrief_core::StepId::from("s-1"),
        &clock,
    )
    .unwrap();
    store.apply(&t.report, &t2).await.unwrap();

    let history = store.history(&report.id).await.unwrap();
    assert!(history.outstanding().is_none());
    assert_eq!(
        history.last_completed().and_then(|e| e.completed_at),
        Some(clock.now())
    );
}

#[tokio::test]
async fn step_lookup_finds_the_step_by_id() {
    let store = MemStore::new();
    store.insert_steps(vec![ApprovalStep {
        id: debrief_core::StepId::from("s-1"),
        kind: StepKind::Planning,
        owner_org: OrgId::from("org-1"),
        next_step: None,
        approvers: vec![PositionId::from("reviewer")],
    }]);

    let found = store.step(&debrief_core::StepId::from("s-1")).await.unwrap();
    assert_eq!(found.map(|s| s.kind), Some(StepKind::Planning));
    assert!(store
        .step(&debrief_core::StepId::from("nope"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn search_finds_reports_by_state() {
    let clock = FakeClock::new();
    let (store, report) = store_with_report(&clock, clock.now());
    let search = MemSearch::new(store);

    let drafts = search.find(ReportState::Draft, true).await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id, report.id);
    assert!(search
        .find(ReportState::Approved, true)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn engagement_search_is_windowed_and_state_gated() {
    let clock = FakeClock::new();
    let now = clock.now();
    let store = MemStore::new();

    let mut inside = Report::new(ReportId::from("inside"), OrgId::from("o"), now, now);
    inside.state = ReportState::PendingApproval;
    inside.engagement_date = now - Duration::hours(1);
    store.insert_report(inside);

    let mut outside = Report::new(ReportId::from("outside"), OrgId::from("o"), now, now);
    outside.state = ReportState::PendingApproval;
    outside.engagement_date = now - Duration::days(3);
    store.insert_report(outside);

    // Same window, but already back in draft: not a candidate
    let mut drafted = Report::new(ReportId::from("drafted"), OrgId::from("o"), now, now);
    drafted.engagement_date = now - Duration::hours(1);
    store.insert_report(drafted);

    let search = MemSearch::new(store);
    let hits = search
        .find_engagement_transitioned(now - Duration::days(1), now)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, ReportId::from("inside"));
}

#[tokio::test]
async fn notify_fake_records_calls() {
    let notify = MemNotify::new();
    notify
        .notify(
            NotifyAction::EngagementPassed {
                report: ReportId::from("r-1"),
            },
            &[PositionId::from("author")],
        )
        .await
        .unwrap();
    let calls = notify.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].recipients, vec![PositionId::from("author")]);
}

#[tokio::test]
async fn notify_fake_can_fail_on_demand() {
    let notify = MemNotify::new();
    notify.set_fail(true);
    let result = notify
        .notify(
            NotifyAction::EngagementPassed {
                report: ReportId::from("r-1"),
            },
            &[],
        )
        .await;
    assert!(result.is_err());
    assert!(notify.calls().is_empty());
}

#[tokio::test]
async fn audit_fake_records_messages() {
    let audit = MemAudit::new();
    audit.record("something happened".to_string()).await;
    assert_eq!(audit.messages(), vec!["something happened".to_string()]);
}

#[tokio::test]
async fn config_reads_see_updates() {
    let config = FixedConfig::new(48, 24);
    assert_eq!(config.workflow_hours().await.approval_timeout, 48);
    config.set(WorkflowHours {
        approval_timeout: 2,
        publication_quarantine: 1,
    });
    assert_eq!(config.workflow_hours().await.approval_timeout, 2);
}
