// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report record and lifecycle states

use crate::id::{OrgId, PositionId, ReportId, StepId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportState {
    Draft,
    PendingApproval,
    Approved,
    Published,
    Rejected,
    Cancelled,
}

impl ReportState {
    pub fn name(&self) -> &'static str {
        match self {
            ReportState::Draft => "draft",
            ReportState::PendingApproval => "pending_approval",
            ReportState::Approved => "approved",
            ReportState::Published => "published",
            ReportState::Rejected => "rejected",
            ReportState::Cancelled => "cancelled",
        }
    }

    /// States from which an engagement-date demotion applies.
    ///
    /// Draft reports are already where the demotion would put them,
    /// and published/rejected/cancelled reports have left the planned
    /// pipeline for good.
    pub fn is_planned_pipeline(&self) -> bool {
        !matches!(
            self,
            ReportState::Draft
                | ReportState::Published
                | ReportState::Rejected
                | ReportState::Cancelled
        )
    }
}

impl std::fmt::Display for ReportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A report moving through its organization's approval process.
///
/// Mutated exclusively through state machine transitions; workers and
/// user-facing callers never write fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub state: ReportState,
    /// When the advising activity occurs; may be in the future at
    /// submission time ("planned" report)
    pub engagement_date: DateTime<Utc>,
    /// Current position in the owning organization's approval chain
    pub current_step: Option<StepId>,
    pub owner_org: OrgId,
    pub authors: Vec<PositionId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn new(
        id: ReportId,
        owner_org: OrgId,
        engagement_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            state: ReportState::Draft,
            engagement_date,
            current_step: None,
            owner_org,
            authors: Vec::new(),
            created_at,
            updated_at: created_at,
            released_at: None,
        }
    }

    pub fn with_authors(mut self, authors: Vec<PositionId>) -> Self {
        self.authors = authors;
        self
    }

    /// Whether the engagement this report describes is still ahead
    pub fn is_future_engagement(&self, now: DateTime<Utc>) -> bool {
        self.engagement_date > now
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
