// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval chain reconstruction
//!
//! An organization's approval process is stored as an unordered set of
//! steps, each holding only a pointer to its successor (the tail has
//! none). [`ApprovalChain::order`] rebuilds the head-to-tail sequence
//! from that linked set.

use crate::id::{OrgId, PositionId, StepId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether a step gates planned engagements or finished reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// Approval of a planned (future) engagement
    Planning,
    /// Approval of a completed report
    Report,
}

/// One gate in an organization's approval process.
///
/// Created by organization setup; read-only to the engine. A step
/// never changes its successor after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalStep {
    pub id: StepId,
    pub kind: StepKind,
    pub owner_org: OrgId,
    /// None marks the chain's tail
    pub next_step: Option<StepId>,
    /// Positions authorized to satisfy this step
    pub approvers: Vec<PositionId>,
}

/// An ordered approval chain, head first
#[derive(Debug, Clone, Default)]
pub struct ApprovalChain {
    steps: Vec<ApprovalStep>,
}

impl ApprovalChain {
    /// Reconstruct the head-to-tail order from an unordered set of
    /// linked steps.
    ///
    /// Walks backwards from the tail: the tail is the step whose
    /// successor is None, its predecessor the step pointing at it, and
    /// so on. A successor-keyed map keeps this linear in the number of
    /// steps. Malformed linkage (cycle, zero or multiple tails,
    /// dangling pointer) terminates the walk early and yields a
    /// truncated chain; unreachable steps are dropped, not reported.
    pub fn order(unordered: Vec<ApprovalStep>) -> Self {
        let total = unordered.len();
        let mut by_successor: HashMap<Option<StepId>, ApprovalStep> = HashMap::new();
        for step in unordered {
            // On duplicate successors keep the first, like the scan
            // this replaces would have.
            by_successor.entry(step.next_step.clone()).or_insert(step);
        }

        let mut ordered = Vec::with_capacity(by_successor.len());
        let mut wanted: Option<StepId> = None;
        while let Some(step) = by_successor.remove(&wanted) {
            wanted = Some(step.id.clone());
            ordered.push(step);
        }
        ordered.reverse();
        if ordered.len() < total {
            tracing::warn!(
                reachable = ordered.len(),
                total,
                "approval chain linkage is malformed, unreachable steps dropped"
            );
        }
        Self { steps: ordered }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// The first step a submitted report enters, if any
    pub fn head(&self) -> Option<&ApprovalStep> {
        self.steps.first()
    }

    pub fn get(&self, id: &StepId) -> Option<&ApprovalStep> {
        self.steps.iter().find(|s| &s.id == id)
    }

    /// The step after the given one, None at the tail (or for an
    /// unknown step)
    pub fn successor_of(&self, id: &StepId) -> Option<&ApprovalStep> {
        let pos = self.steps.iter().position(|s| &s.id == id)?;
        self.steps.get(pos + 1)
    }

    pub fn steps(&self) -> &[ApprovalStep] {
        &self.steps
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
