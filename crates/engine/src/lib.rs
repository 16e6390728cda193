// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! debrief-engine: time-driven workflow workers for the report
//! lifecycle
//!
//! A scheduler fires each worker on its own interval; the worker asks
//! search for candidates, decides per report whether a deadline or
//! calendar event has elapsed, and drives the state machine. The run
//! ledger makes ticks incremental and idempotent.

pub mod approval_timeout;
pub mod context;
pub mod engagement;
pub mod error;
pub mod ledger;
pub mod publication;
pub mod runner;

pub use approval_timeout::ApprovalTimeoutWorker;
pub use context::{Collaborators, Env};
pub use engagement::EngagementDateReconciliationWorker;
pub use error::EngineError;
pub use ledger::{MemRunLedger, RunLedger};
pub use publication::PublicationQuarantineWorker;
pub use runner::{ItemOutcome, TickSummary, Worker, WorkerRunner};
