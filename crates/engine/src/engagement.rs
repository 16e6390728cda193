// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engagement date reconciliation worker
//!
//! A "planned" report describes an engagement that has not happened
//! yet. Once the engagement date passes, the report no longer reflects
//! reality: its authors are told to complete it and the report is
//! pulled back to draft. Candidates come from an incremental window
//! over the previous successful run, so a report resubmitted after a
//! demotion is not matched again.

use crate::context::{commit, Collaborators};
use crate::error::EngineError;
use crate::runner::{ItemOutcome, TickSummary, Worker};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use debrief_adapters::{NotifyAdapter, ReportStore, SearchAdapter};
use debrief_core::{machine, NotifyAction, Report};

/// Window used on the very first run, when no ledger entry exists yet
const FIRST_RUN_LOOKBACK_HOURS: i64 = 24;

pub struct EngagementDateReconciliationWorker<E> {
    env: E,
}

impl<E: Collaborators> EngagementDateReconciliationWorker<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    async fn process_one(&self, report: &Report) -> Result<ItemOutcome, EngineError> {
        // Tell the authors first; if the notification cannot even be
        // queued the item fails and the window is retried next tick.
        self.env
            .notify()
            .notify(
                NotifyAction::EngagementPassed {
                    report: report.id.clone(),
                },
                &report.authors,
            )
            .await
            .map_err(|e| EngineError::Task(e.to_string()))?;

        let history = self.env.store().history(&report.id).await?;
        let transition = machine::demote_for_engagement_date(report, &history, &self.env.clock())?;
        commit(&self.env, report, &transition).await
    }
}

#[async_trait]
impl<E: Collaborators> Worker for EngagementDateReconciliationWorker<E> {
    fn name(&self) -> &'static str {
        "engagement-reconciliation"
    }

    async fn tick(
        &self,
        now: DateTime<Utc>,
        last_run: Option<DateTime<Utc>>,
    ) -> Result<TickSummary, EngineError> {
        let since = last_run.unwrap_or(now - Duration::hours(FIRST_RUN_LOOKBACK_HOURS));
        let candidates = self
            .env
            .search()
            .find_engagement_transitioned(since, now)
            .await?;

        // Sequential, one failure logged and the loop continues
        let mut summary = TickSummary::default();
        for report in candidates {
            match self.process_one(&report).await {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    tracing::warn!(report = %report.id, error = %e, "engagement reconciliation item failed");
                    summary.record(ItemOutcome::Failed);
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "engagement_tests.rs"]
mod tests;
