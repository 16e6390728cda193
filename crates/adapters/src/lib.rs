// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Collaborator seams for the report lifecycle engine, plus the
//! in-memory implementations backing the daemon and tests

pub mod mem;
pub mod traits;

pub use mem::{FixedConfig, MemAudit, MemNotify, MemSearch, MemStore, NotifyCall};
pub use traits::{
    Applied, AuditAdapter, ConfigAdapter, NotifyAdapter, NotifyError, ReportStore, SearchAdapter,
    SearchError, StoreError, WorkflowHours,
};
