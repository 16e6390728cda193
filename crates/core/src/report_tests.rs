// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;

fn report_at(engagement: DateTime<Utc>) -> Report {
    Report::new(
        ReportId::from("r-1"),
        OrgId::from("org-1"),
        engagement,
        Utc::now(),
    )
}

#[test]
fn new_report_starts_as_draft_without_step() {
    let r = report_at(Utc::now());
    assert_eq!(r.state, ReportState::Draft);
    assert!(r.current_step.is_none());
    assert!(r.released_at.is_none());
}

#[test]
fn future_engagement_is_relative_to_now() {
    let now = Utc::now();
    let r = report_at(now + Duration::days(2));
    assert!(r.is_future_engagement(now));
    assert!(!r.is_future_engagement(now + Duration::days(3)));
}

#[test]
fn engagement_date_exactly_now_is_not_future() {
    let now = Utc::now();
    let r = report_at(now);
    assert!(!r.is_future_engagement(now));
}

#[test]
fn planned_pipeline_states() {
    assert!(ReportState::PendingApproval.is_planned_pipeline());
    assert!(ReportState::Approved.is_planned_pipeline());
    assert!(!ReportState::Draft.is_planned_pipeline());
    assert!(!ReportState::Published.is_planned_pipeline());
    assert!(!ReportState::Rejected.is_planned_pipeline());
    assert!(!ReportState::Cancelled.is_planned_pipeline());
}

#[test]
fn state_names_are_stable() {
    assert_eq!(ReportState::PendingApproval.name(), "pending_approval");
    assert_eq!(ReportState::Approved.to_string(), "approved");
}

#[test]
fn report_round_trips_through_json() {
    let r = report_at(Utc::now()).with_authors(vec![PositionId::from("p-1")]);
    let json = serde_json::to_string(&r).unwrap();
    let back: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);
}
