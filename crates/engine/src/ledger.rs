// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-worker run ledger
//!
//! One entry per worker identity holding the timestamp of the last
//! fully successful tick. The runner reads it at the start of a tick
//! to compute the incremental window and writes it back only after the
//! tick succeeds, so a crashed tick replays the same window next time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use debrief_adapters::StoreError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Last-successful-run bookkeeping, keyed by worker identity
#[async_trait]
pub trait RunLedger: Clone + Send + Sync + 'static {
    async fn last_run(&self, worker: &str) -> Result<Option<DateTime<Utc>>, StoreError>;

    async fn record_run(&self, worker: &str, at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// In-memory run ledger
#[derive(Clone, Default)]
pub struct MemRunLedger {
    runs: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
}

impl MemRunLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunLedger for MemRunLedger {
    async fn last_run(&self, worker: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        let runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(runs.get(worker).copied())
    }

    async fn record_run(&self, worker: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        runs.insert(worker.to_string(), at);
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
