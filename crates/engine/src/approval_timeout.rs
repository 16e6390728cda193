// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval timeout worker
//!
//! Reports stuck in PENDING_APPROVAL longer than the configured
//! timeout are approved on the current step's behalf. The timeout is
//! measured from the completed entry immediately preceding the
//! outstanding one, i.e. from when the report entered its current step.

use crate::context::{commit, resolve_chain, Collaborators};
use crate::error::EngineError;
use crate::runner::{ItemOutcome, TickSummary, Worker};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use debrief_adapters::{ConfigAdapter, ReportStore, SearchAdapter};
use debrief_core::{machine, Report, ReportState};
use tokio::task::JoinSet;

pub struct ApprovalTimeoutWorker<E> {
    env: E,
}

impl<E: Collaborators> ApprovalTimeoutWorker<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    async fn process_one(
        env: E,
        report: Report,
        cutoff: DateTime<Utc>,
    ) -> Result<ItemOutcome, EngineError> {
        let Some(step_id) = report.current_step.clone() else {
            return Err(EngineError::inconsistency(
                &report.id,
                "pending approval without a current step",
            ));
        };
        let history = env.store().history(&report.id).await?;
        if history.outstanding_for(&step_id).is_none() {
            return Err(EngineError::inconsistency(
                &report.id,
                format!("no outstanding workflow entry for step {step_id}"),
            ));
        }
        // The first chain step has no preceding completed entry; it is
        // satisfied by its approvers, not by the timeout.
        let Some(entered_at) = history.preceding_completed().and_then(|e| e.completed_at) else {
            return Ok(ItemOutcome::Skipped);
        };
        if entered_at > cutoff {
            return Ok(ItemOutcome::Skipped);
        }

        let chain = resolve_chain(&env, &report, &step_id).await?;
        let transition =
            machine::approve(&report, &history, &chain, None, &step_id, &env.clock())?;
        commit(&env, &report, &transition).await
    }
}

#[async_trait]
impl<E: Collaborators> Worker for ApprovalTimeoutWorker<E> {
    fn name(&self) -> &'static str {
        "approval-timeout"
    }

    async fn tick(
        &self,
        now: DateTime<Utc>,
        _last_run: Option<DateTime<Utc>>,
    ) -> Result<TickSummary, EngineError> {
        let hours = self.env.config().workflow_hours().await;
        let cutoff = now - Duration::hours(hours.approval_timeout);
        let candidates = self
            .env
            .search()
            .find(ReportState::PendingApproval, true)
            .await?;

        // One lookup task per candidate; the whole batch is joined
        // before the tick returns, and each item carries its own
        // outcome so one failure cannot take the batch down.
        let mut batch = JoinSet::new();
        for report in candidates {
            let env = self.env.clone();
            let id = report.id.clone();
            batch.spawn(async move { (id, Self::process_one(env, report, cutoff).await) });
        }

        let mut summary = TickSummary::default();
        while let Some(joined) = batch.join_next().await {
            match joined {
                Ok((_, Ok(outcome))) => summary.record(outcome),
                Ok((id, Err(e))) => {
                    tracing::warn!(report = %id, error = %e, "approval timeout item failed");
                    summary.record(ItemOutcome::Failed);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "approval timeout task aborted");
                    summary.record(ItemOutcome::Failed);
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "approval_timeout_tests.rs"]
mod tests;
