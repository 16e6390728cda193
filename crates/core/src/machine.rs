// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report lifecycle state machine
//!
//! Pure transition functions: each operation takes the report, its
//! workflow history and the resolved approval chain, and returns a
//! [`Transition`] describing the updated report, the history changes
//! and the side-effect requests. Nothing here touches storage; the
//! caller applies the transition conditionally so a lost race shows up
//! as a stale apply, not a double transition.

use crate::chain::ApprovalChain;
use crate::clock::Clock;
use crate::history::{EntryKind, WorkflowEntry, WorkflowHistory};
use crate::id::{EntryId, PositionId, ReportId, StepId};
use crate::report::{Report, ReportState};
use thiserror::Error;

/// Side-effect requests produced by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Record a line in the durable audit trail
    Audit { message: String },
    /// Queue a notification, fire-and-forget
    Notify {
        action: NotifyAction,
        recipients: Vec<PositionId>,
    },
}

/// What a notification is about
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyAction {
    /// A step is waiting on its approvers
    ApprovalNeeded { report: ReportId, step: StepId },
    /// The report went back to draft with a reviewer comment
    Rejected { report: ReportId },
    /// The engagement date passed; the report needs completion
    EngagementPassed { report: ReportId },
}

/// The outcome of one state machine operation
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Updated copy of the report
    pub report: Report,
    /// Outstanding entry to stamp as completed, if any
    pub complete: Option<EntryId>,
    /// New history entries to append
    pub append: Vec<WorkflowEntry>,
    /// Side effects for the caller to dispatch
    pub effects: Vec<Effect>,
}

impl Transition {
    fn noop(report: &Report) -> Self {
        Self {
            report: report.clone(),
            complete: None,
            append: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// True when the operation decided nothing needs to change
    /// (e.g. an approve replayed against an already-completed step)
    pub fn is_noop(&self) -> bool {
        self.complete.is_none() && self.append.is_empty() && self.effects.is_empty()
    }
}

/// Why an operation was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("report {report} is {actual}, operation requires {required}")]
    InvalidState {
        report: ReportId,
        required: ReportState,
        actual: ReportState,
    },
    #[error("report {report} is at step {current:?}, not {given}")]
    WrongStep {
        report: ReportId,
        given: StepId,
        current: Option<StepId>,
    },
    #[error("position {actor} is not an approver for step {step}")]
    NotAuthorized { actor: PositionId, step: StepId },
    #[error("report {report} has no report approval chain for org {org}")]
    NoApprovalChain { report: ReportId, org: String },
    #[error("report {report} has no outstanding workflow entry for step {step}")]
    MissingOutstandingEntry { report: ReportId, step: StepId },
}

/// Submit a draft report into its organization's approval chain.
///
/// A future engagement with an empty planning chain is approved
/// directly, recorded as a planned auto-approval. A finished report
/// with an empty chain is a configuration problem and is refused.
pub fn submit(
    report: &Report,
    chain: &ApprovalChain,
    clock: &impl Clock,
) -> Result<Transition, TransitionError> {
    require_state(report, ReportState::Draft)?;
    let now = clock.now();

    let Some(head) = chain.head() else {
        if !report.is_future_engagement(now) {
            return Err(TransitionError::NoApprovalChain {
                report: report.id.clone(),
                org: report.owner_org.to_string(),
            });
        }
        let mut updated = report.clone();
        updated.state = ReportState::Approved;
        updated.current_step = None;
        updated.updated_at = now;
        let entry =
            WorkflowEntry::completed(report.id.clone(), None, EntryKind::Approve, None, now)
                .planned();
        return Ok(Transition {
            report: updated,
            complete: None,
            append: vec![entry],
            effects: vec![Effect::Audit {
                message: format!(
                    "report {} submitted and approved directly (no planning chain)",
                    report.id
                ),
            }],
        });
    };

    // Non-empty chain: park the report at the head
    let mut updated = report.clone();
    updated.state = ReportState::PendingApproval;
    updated.current_step = Some(head.id.clone());
    updated.updated_at = now;
    let entry = WorkflowEntry::outstanding(report.id.clone(), head.id.clone());
    Ok(Transition {
        report: updated,
        complete: None,
        append: vec![entry],
        effects: vec![
            Effect::Audit {
                message: format!("report {} submitted into step {}", report.id, head.id),
            },
            Effect::Notify {
                action: NotifyAction::ApprovalNeeded {
                    report: report.id.clone(),
                    step: head.id.clone(),
                },
                recipients: head.approvers.clone(),
            },
        ],
    })
}

/// Approve the report at the given step, advancing it along the chain.
///
/// `actor` is None for autonomous approvals (the timeout worker); a
/// given actor must hold one of the step's approver positions.
/// Replaying an approve against an already-completed step is a no-op.
pub fn approve(
    report: &Report,
    history: &WorkflowHistory,
    chain: &ApprovalChain,
    actor: Option<&PositionId>,
    step_id: &StepId,
    clock: &impl Clock,
) -> Result<Transition, TransitionError> {
    require_state(report, ReportState::PendingApproval)?;
    if report.current_step.as_ref() != Some(step_id) {
        return Err(TransitionError::WrongStep {
            report: report.id.clone(),
            given: step_id.clone(),
            current: report.current_step.clone(),
        });
    }
    if let Some(actor) = actor {
        let authorized = chain
            .get(step_id)
            .is_some_and(|s| s.approvers.contains(actor));
        if !authorized {
            return Err(TransitionError::NotAuthorized {
                actor: actor.clone(),
                step: step_id.clone(),
            });
        }
    }

    let outstanding = match history.outstanding_for(step_id) {
        Some(entry) => entry,
        None => {
            // Raced with another tick: the entry for this step may
            // already be completed, in which case there is nothing
            // left to do.
            let already_done = history
                .entries()
                .iter()
                .any(|e| e.step.as_ref() == Some(step_id) && !e.is_outstanding());
            if already_done {
                return Ok(Transition::noop(report));
            }
            return Err(TransitionError::MissingOutstandingEntry {
                report: report.id.clone(),
                step: step_id.clone(),
            });
        }
    };

    let now = clock.now();
    let mut updated = report.clone();
    updated.updated_at = now;
    let mut append = Vec::new();
    let mut effects = vec![Effect::Audit {
        message: match actor {
            Some(actor) => format!("report {} step {step_id} approved by {actor}", report.id),
            None => format!("report {} step {step_id} approved automatically", report.id),
        },
    }];

    match chain.successor_of(step_id) {
        Some(next) => {
            updated.current_step = Some(next.id.clone());
            append.push(WorkflowEntry::outstanding(report.id.clone(), next.id.clone()));
            effects.push(Effect::Notify {
                action: NotifyAction::ApprovalNeeded {
                    report: report.id.clone(),
                    step: next.id.clone(),
                },
                recipients: next.approvers.clone(),
            });
        }
        None => {
            // Tail step: approvals are done
            updated.state = ReportState::Approved;
            updated.current_step = None;
        }
    }

    Ok(Transition {
        report: updated,
        complete: Some(outstanding.id.clone()),
        append,
        effects,
    })
}

/// Send the report back to draft with a reviewer comment. The report
/// has to be resubmitted to re-enter the pipeline.
pub fn reject(
    report: &Report,
    history: &WorkflowHistory,
    actor: &PositionId,
    comment: &str,
    clock: &impl Clock,
) -> Result<Transition, TransitionError> {
    require_state(report, ReportState::PendingApproval)?;
    let now = clock.now();

    let mut updated = report.clone();
    updated.state = ReportState::Draft;
    updated.current_step = None;
    updated.updated_at = now;

    // Stamp the outstanding entry so the history does not keep a
    // dangling pending step across the resubmission.
    let complete = history.outstanding().map(|e| e.id.clone());
    let entry = WorkflowEntry::completed(
        report.id.clone(),
        report.current_step.clone(),
        EntryKind::Reject,
        Some(actor.clone()),
        now,
    )
    .with_comment(comment);

    Ok(Transition {
        report: updated,
        complete,
        append: vec![entry],
        effects: vec![
            Effect::Audit {
                message: format!("report {} rejected by {actor}", report.id),
            },
            Effect::Notify {
                action: NotifyAction::Rejected {
                    report: report.id.clone(),
                },
                recipients: report.authors.clone(),
            },
        ],
    })
}

/// Release an approved report out of quarantine.
pub fn publish(
    report: &Report,
    actor: Option<&PositionId>,
    clock: &impl Clock,
) -> Result<Transition, TransitionError> {
    require_state(report, ReportState::Approved)?;
    let now = clock.now();

    let mut updated = report.clone();
    updated.state = ReportState::Published;
    updated.released_at = Some(now);
    updated.updated_at = now;
    let entry = WorkflowEntry::completed(
        report.id.clone(),
        None,
        EntryKind::Publish,
        actor.cloned(),
        now,
    );

    Ok(Transition {
        report: updated,
        complete: None,
        append: vec![entry],
        effects: vec![Effect::Audit {
            message: match actor {
                Some(actor) => format!("report {} published by {actor}", report.id),
                None => format!("report {} published automatically", report.id),
            },
        }],
    })
}

/// Pull a planned report back to draft because its engagement date has
/// passed. Bypasses the forward-only progression; only the
/// reconciliation worker calls this, gated by its candidate query.
pub fn demote_for_engagement_date(
    report: &Report,
    history: &WorkflowHistory,
    clock: &impl Clock,
) -> Result<Transition, TransitionError> {
    if !report.state.is_planned_pipeline() {
        return Err(TransitionError::InvalidState {
            report: report.id.clone(),
            required: ReportState::PendingApproval,
            actual: report.state,
        });
    }
    let now = clock.now();

    let mut updated = report.clone();
    updated.state = ReportState::Draft;
    updated.current_step = None;
    updated.updated_at = now;

    Ok(Transition {
        report: updated,
        complete: history.outstanding().map(|e| e.id.clone()),
        append: Vec::new(),
        effects: vec![Effect::Audit {
            message: format!(
                "report {} returned to draft, engagement date {} has passed",
                report.id, report.engagement_date
            ),
        }],
    })
}

fn require_state(report: &Report, required: ReportState) -> Result<(), TransitionError> {
    if report.state != required {
        return Err(TransitionError::InvalidState {
            report: report.id.clone(),
            required,
            actual: report.state,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
