// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only workflow history
//!
//! Every workflow action on a report leaves one entry. An entry with
//! no `completed_at` is the single currently outstanding step; stamping
//! that timestamp is the only mutation an entry ever sees.

use crate::id::{EntryId, PositionId, ReportId, StepId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of action an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Approve,
    Reject,
    Publish,
}

/// One record of a workflow action, pending or completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEntry {
    pub id: EntryId,
    pub report: ReportId,
    /// None denotes the publication entry (and the planned auto-approval)
    pub step: Option<StepId>,
    pub kind: EntryKind,
    /// Who acted; None for autonomous transitions
    pub actor: Option<PositionId>,
    /// None means this step is currently outstanding
    pub completed_at: Option<DateTime<Utc>>,
    /// Set when the step was satisfied automatically because the
    /// chain had zero steps
    pub planned: bool,
    pub comment: Option<String>,
}

impl WorkflowEntry {
    /// An outstanding approval entry for a step the report just entered
    pub fn outstanding(report: ReportId, step: StepId) -> Self {
        Self {
            id: EntryId::generate(),
            report,
            step: Some(step),
            kind: EntryKind::Approve,
            actor: None,
            completed_at: None,
            planned: false,
            comment: None,
        }
    }

    /// A completed entry recorded in one shot (planned auto-approval,
    /// rejection, publication)
    pub fn completed(
        report: ReportId,
        step: Option<StepId>,
        kind: EntryKind,
        actor: Option<PositionId>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::generate(),
            report,
            step,
            kind,
            actor,
            completed_at: Some(at),
            planned: false,
            comment: None,
        }
    }

    pub fn planned(mut self) -> Self {
        self.planned = true;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_outstanding(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// A report's workflow entries in append order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowHistory {
    entries: Vec<WorkflowEntry>,
}

impl WorkflowHistory {
    pub fn new(entries: Vec<WorkflowEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[WorkflowEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&WorkflowEntry> {
        self.entries.last()
    }

    /// The single outstanding entry, if the report is mid-approval
    pub fn outstanding(&self) -> Option<&WorkflowEntry> {
        self.entries.iter().find(|e| e.is_outstanding())
    }

    /// The outstanding entry for a specific step
    pub fn outstanding_for(&self, step: &StepId) -> Option<&WorkflowEntry> {
        self.entries
            .iter()
            .find(|e| e.is_outstanding() && e.step.as_ref() == Some(step))
    }

    /// The completed entry immediately preceding the outstanding one.
    ///
    /// Its timestamp is when the report entered the current step, which
    /// is what the approval timeout measures against.
    pub fn preceding_completed(&self) -> Option<&WorkflowEntry> {
        let outstanding_pos = self.entries.iter().position(|e| e.is_outstanding())?;
        self.entries[..outstanding_pos]
            .iter()
            .rev()
            .find(|e| !e.is_outstanding())
    }

    /// The most recent completed entry; for an approved report this is
    /// when approval finished, which is what the publication quarantine
    /// measures against.
    pub fn last_completed(&self) -> Option<&WorkflowEntry> {
        self.entries.iter().rev().find(|e| !e.is_outstanding())
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
