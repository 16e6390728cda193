// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator trait definitions
//!
//! The engine never reaches for a global: every worker receives its
//! search, notification, audit, configuration and store collaborators
//! at construction through these seams.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use debrief_core::{
    ApprovalStep, NotifyAction, OrgId, PositionId, Report, ReportId, ReportState, StepId,
    StepKind, Transition, WorkflowHistory,
};
use thiserror::Error;

// =============================================================================
// Search
// =============================================================================

/// Errors from candidate discovery
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search backend failure: {0}")]
    Backend(String),
}

/// Locates candidate reports for the workers.
///
/// `system_level` bypasses per-user visibility rules; workers always
/// pass true since they act for no particular user.
#[async_trait]
pub trait SearchAdapter: Clone + Send + Sync + 'static {
    /// All reports currently in the given state
    async fn find(
        &self,
        state: ReportState,
        system_level: bool,
    ) -> Result<Vec<Report>, SearchError>;

    /// Reports in a planned pipeline state whose engagement date
    /// crossed from future to past inside the window. Bounded and
    /// incremental so a tick never degenerates into a full scan.
    async fn find_engagement_transitioned(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Report>, SearchError>;
}

// =============================================================================
// Notification
// =============================================================================

/// Errors from notification queuing
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification failed: {0}")]
    Failed(String),
}

/// Queues notifications. Fire-and-forget from the engine's point of
/// view; delivery retries are the implementation's business.
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(
        &self,
        action: NotifyAction,
        recipients: &[PositionId],
    ) -> Result<(), NotifyError>;
}

// =============================================================================
// Audit
// =============================================================================

/// Durable operator-facing trail. Called once per automatic
/// transition; failures are logged by callers, never escalated.
#[async_trait]
pub trait AuditAdapter: Clone + Send + Sync + 'static {
    async fn record(&self, message: String);
}

// =============================================================================
// Configuration
// =============================================================================

/// Workflow deadlines, in hours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowHours {
    /// How long an approval step may sit before the engine approves it
    pub approval_timeout: i64,
    /// Mandatory delay between full approval and publication
    pub publication_quarantine: i64,
}

/// Supplies workflow deadlines. Re-read fresh on every tick so
/// operators can adjust them without a restart.
#[async_trait]
pub trait ConfigAdapter: Clone + Send + Sync + 'static {
    async fn workflow_hours(&self) -> WorkflowHours;
}

// =============================================================================
// Report store
// =============================================================================

/// Errors from the report/workflow store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("report not found: {0}")]
    ReportNotFound(ReportId),
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Result of a conditional transition apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The transition landed
    Committed,
    /// The report no longer matched the state the transition was
    /// computed from; another tick got there first
    Stale,
}

/// Storage seam for reports, workflow history and approval steps.
///
/// `apply` is the only write path: it commits a transition iff the
/// stored report still has the state and current step the transition
/// was computed from, so replays and races surface as [`Applied::Stale`]
/// instead of double transitions.
#[async_trait]
pub trait ReportStore: Clone + Send + Sync + 'static {
    async fn get(&self, id: &ReportId) -> Result<Report, StoreError>;

    async fn history(&self, id: &ReportId) -> Result<WorkflowHistory, StoreError>;

    /// A single approval step by id
    async fn step(&self, id: &StepId) -> Result<Option<ApprovalStep>, StoreError>;

    /// The unordered approval step set for an organization
    async fn approval_steps(
        &self,
        org: &OrgId,
        kind: StepKind,
    ) -> Result<Vec<ApprovalStep>, StoreError>;

    /// Conditionally commit a transition computed from `expected`
    async fn apply(&self, expected: &Report, transition: &Transition)
        -> Result<Applied, StoreError>;
}
