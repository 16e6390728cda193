// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker template
//!
//! [`WorkerRunner`] wraps one tick: read the run ledger, invoke the
//! worker body, and on success write the run back. A failing tick is
//! logged and swallowed so the scheduler never loses a worker, and the
//! ledger is left untouched so the same window is retried next tick.

use crate::error::EngineError;
use crate::ledger::RunLedger;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use debrief_core::Clock;

/// What happened to one candidate within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The report transitioned
    Transitioned,
    /// Deadline not reached, race lost, or nothing to do
    Skipped,
    /// The item failed; logged, batch continued
    Failed,
}

/// Per-tick counts for operational logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub candidates: usize,
    pub transitioned: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl TickSummary {
    pub fn record(&mut self, outcome: ItemOutcome) {
        self.candidates += 1;
        match outcome {
            ItemOutcome::Transitioned => self.transitioned += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}

/// One background worker's tick body
#[async_trait]
pub trait Worker: Send + Sync {
    /// Stable identity; keys the run ledger
    fn name(&self) -> &'static str;

    async fn tick(
        &self,
        now: DateTime<Utc>,
        last_run: Option<DateTime<Utc>>,
    ) -> Result<TickSummary, EngineError>;
}

/// Drives a worker from the scheduler's fixed interval
pub struct WorkerRunner<W, L, K> {
    worker: W,
    ledger: L,
    clock: K,
}

impl<W: Worker, L: RunLedger, K: Clock> WorkerRunner<W, L, K> {
    pub fn new(worker: W, ledger: L, clock: K) -> Self {
        Self {
            worker,
            ledger,
            clock,
        }
    }

    /// Run one tick. Never raises: any failure is logged here, and the
    /// ledger only advances after a fully successful tick.
    pub async fn run(&self) -> Option<TickSummary> {
        let name = self.worker.name();
        let now = self.clock.now();

        let last_run = match self.ledger.last_run(name).await {
            Ok(last_run) => last_run,
            Err(e) => {
                tracing::error!(worker = name, error = %e, "failed to read run ledger, skipping tick");
                return None;
            }
        };

        match self.worker.tick(now, last_run).await {
            Ok(summary) => {
                tracing::info!(
                    worker = name,
                    candidates = summary.candidates,
                    transitioned = summary.transitioned,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    "tick complete"
                );
                if let Err(e) = self.ledger.record_run(name, now).await {
                    tracing::error!(worker = name, error = %e, "failed to record run");
                }
                Some(summary)
            }
            Err(e) => {
                tracing::error!(worker = name, error = %e, "tick failed, window will be retried");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
