// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! debrief-core: domain model and state machines for the report
//! lifecycle engine
//!
//! This crate provides:
//! - The report record and its lifecycle states
//! - Approval chain reconstruction from linked step sets
//! - The append-only workflow history
//! - Pure lifecycle transitions returning effects

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod chain;
pub mod clock;
pub mod history;
pub mod id;
pub mod machine;
pub mod report;

// Re-exports
pub use chain::{ApprovalChain, ApprovalStep, StepKind};
pub use clock::{Clock, FakeClock, SystemClock};
pub use history::{EntryKind, WorkflowEntry, WorkflowHistory};
pub use id::{EntryId, OrgId, PositionId, ReportId, StepId};
pub use machine::{Effect, NotifyAction, Transition, TransitionError};
pub use report::{Report, ReportState};
