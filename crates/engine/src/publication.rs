// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publication quarantine worker
//!
//! An approved report sits in quarantine for the configured number of
//! hours, measured from its last completed workflow entry, so there is
//! a window for last-minute recall. Once that delay has elapsed the
//! report is published autonomously.

use crate::context::{commit, Collaborators};
use crate::error::EngineError;
use crate::runner::{ItemOutcome, TickSummary, Worker};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use debrief_adapters::{ConfigAdapter, ReportStore, SearchAdapter};
use debrief_core::{machine, Report, ReportState};
use tokio::task::JoinSet;

pub struct PublicationQuarantineWorker<E> {
    env: E,
}

impl<E: Collaborators> PublicationQuarantineWorker<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    async fn process_one(
        env: E,
        report: Report,
        cutoff: DateTime<Utc>,
    ) -> Result<ItemOutcome, EngineError> {
        let history = env.store().history(&report.id).await?;
        let Some(approved_at) = history.last_completed().and_then(|e| e.completed_at) else {
            return Err(EngineError::inconsistency(
                &report.id,
                "approved report with no completed workflow entry",
            ));
        };
        if approved_at > cutoff {
            return Ok(ItemOutcome::Skipped);
        }

        let transition = machine::publish(&report, None, &env.clock())?;
        commit(&env, &report, &transition).await
    }
}

#[async_trait]
impl<E: Collaborators> Worker for PublicationQuarantineWorker<E> {
    fn name(&self) -> &'static str {
        "publication-quarantine"
    }

    async fn tick(
        &self,
        now: DateTime<Utc>,
        _last_run: Option<DateTime<Utc>>,
    ) -> Result<TickSummary, EngineError> {
        let hours = self.env.config().workflow_hours().await;
        let cutoff = now - Duration::hours(hours.publication_quarantine);
        let candidates = self.env.search().find(ReportState::Approved, true).await?;

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
                    tracing::warn!(report = %id, error = %e, "publication item failed");
                    summary.record(ItemOutcome::Failed);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "publication task aborted");
                    summary.record(ItemOutcome::Failed);
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "publication_tests.rs"]
mod tests;
