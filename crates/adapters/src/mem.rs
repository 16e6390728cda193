// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory collaborator implementations
//!
//! Back the daemon's default wiring and every worker test. All state
//! lives behind an `Arc<Mutex<_>>` so clones share it; the notify and
//! audit fakes record their calls for inspection.

use crate::traits::{
    Applied, AuditAdapter, ConfigAdapter, NotifyAdapter, NotifyError, ReportStore, SearchAdapter,
    SearchError, StoreError, WorkflowHours,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use debrief_core::{
    ApprovalStep, NotifyAction, OrgId, PositionId, Report, ReportId, ReportState, StepId,
    StepKind, Transition, WorkflowEntry, WorkflowHistory,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct StoreState {
    reports: HashMap<ReportId, Report>,
    histories: HashMap<ReportId, Vec<WorkflowEntry>>,
    steps: Vec<ApprovalStep>,
}

/// In-memory report/workflow store, shared across clones
#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_report(&self, report: Report) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.reports.insert(report.id.clone(), report);
    }

    pub fn insert_steps(&self, steps: Vec<ApprovalStep>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.steps.extend(steps);
    }

    /// Replace a report's history wholesale; used to set up corrupt
    /// histories in fault-isolation tests
    pub fn set_history(&self, id: &ReportId, entries: Vec<WorkflowEntry>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.histories.insert(id.clone(), entries);
    }

    pub fn report(&self, id: &ReportId) -> Option<Report> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.reports.get(id).cloned()
    }

    fn all_reports(&self) -> Vec<Report> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.reports.values().cloned().collect()
    }
}

#[async_trait]
impl ReportStore for MemStore {
    async fn get(&self, id: &ReportId) -> Result<Report, StoreError> {
        self.report(id)
            .ok_or_else(|| StoreError::ReportNotFound(id.clone()))
    }

    async fn history(&self, id: &ReportId) -> Result<WorkflowHistory, StoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(WorkflowHistory::new(
            state.histories.get(id).cloned().unwrap_or_default(),
        ))
    }

    async fn step(&self, id: &StepId) -> Result<Option<ApprovalStep>, StoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state.steps.iter().find(|s| &s.id == id).cloned())
    }

    async fn approval_steps(
        &self,
        org: &OrgId,
        kind: StepKind,
    ) -> Result<Vec<ApprovalStep>, StoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .steps
            .iter()
            .filter(|s| &s.owner_org == org && s.kind == kind)
            .cloned()
            .collect())
    }

    async fn apply(
        &self,
        expected: &Report,
        transition: &Transition,
    ) -> Result<Applied, StoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let stored = state
            .reports
            .get(&expected.id)
            .ok_or_else(|| StoreError::ReportNotFound(expected.id.clone()))?;

        // Conditional update: commit only if nothing moved underneath us
        if stored.state != expected.state || stored.current_step != expected.current_step {
            return Ok(Applied::Stale);
        }

        state
            .reports
            .insert(transition.report.id.clone(), transition.report.clone());

        let entries = state
            .histories
            .entry(transition.report.id.clone())
            .or_default();
        if let Some(id) = &transition.complete {
            // Transitions carry their timestamp as the report's updated_at
            let at = transition.report.updated_at;
            for e in entries.iter_mut() {
                if &e.id == id {
                    e.completed_at = Some(at);
                }
            }
        }
        entries.extend(transition.append.iter().cloned());

        Ok(Applied::Committed)
    }
}

/// Search over the in-memory store
#[derive(Clone)]
pub struct MemSearch {
    store: MemStore,
}

impl MemSearch {
    pub fn new(store: MemStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SearchAdapter for MemSearch {
    async fn find(
        &self,
        state: ReportState,
        _system_level: bool,
    ) -> Result<Vec<Report>, SearchError> {
        Ok(self
            .store
            .all_reports()
            .into_iter()
            .filter(|r| r.state == state)
            .collect())
    }

    async fn find_engagement_transitioned(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Report>, SearchError> {
        Ok(self
            .store
            .all_reports()
            .into_iter()
            .filter(|r| {
                r.state.is_planned_pipeline()
                    && r.engagement_date > since
                    && r.engagement_date <= until
            })
            .collect())
    }
}

/// One recorded notification
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyCall {
    pub action: NotifyAction,
    pub recipients: Vec<PositionId>,
}

/// Notification fake that records calls
#[derive(Clone, Default)]
pub struct MemNotify {
    calls: Arc<Mutex<Vec<NotifyCall>>>,
    fail: Arc<Mutex<bool>>,
}

impl MemNotify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NotifyCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make subsequent notify calls fail, for failure-path tests
    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }
}

#[async_trait]
impl NotifyAdapter for MemNotify {
    async fn notify(
        &self,
        action: NotifyAction,
        recipients: &[PositionId],
    ) -> Result<(), NotifyError> {
        if *self.fail.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(NotifyError::Failed("notify fake set to fail".to_string()));
        }
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(NotifyCall {
                action,
                recipients: recipients.to_vec(),
            });
        Ok(())
    }
}

/// Audit fake that records messages (and mirrors them to tracing)
#[derive(Clone, Default)]
pub struct MemAudit {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl AuditAdapter for MemAudit {
    async fn record(&self, message: String) {
        tracing::info!(target: "audit", "{message}");
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
    }
}

/// Config source with adjustable hours; reads always see the latest
/// values, matching the hot-reload contract
#[derive(Clone)]
pub struct FixedConfig {
    hours: Arc<Mutex<WorkflowHours>>,
}

impl FixedConfig {
    pub fn new(approval_timeout: i64, publication_quarantine: i64) -> Self {
        Self {
            hours: Arc::new(Mutex::new(WorkflowHours {
                approval_timeout,
                publication_quarantine,
            })),
        }
    }

    pub fn set(&self, hours: WorkflowHours) {
        *self.hours.lock().unwrap_or_else(|e| e.into_inner()) = hours;
    }
}

#[async_trait]
impl ConfigAdapter for FixedConfig {
    async fn workflow_hours(&self) -> WorkflowHours {
        *self.hours.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "mem_tests.rs"]
mod tests;
