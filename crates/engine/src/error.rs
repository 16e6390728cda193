// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy

use debrief_adapters::{SearchError, StoreError};
use debrief_core::{ReportId, TransitionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("search error: {0}")]
    Search(#[from] SearchError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("transition refused: {0}")]
    Transition(#[from] TransitionError),
    #[error("report {report} has inconsistent workflow data: {detail}")]
    Inconsistency { report: ReportId, detail: String },
    #[error("batch task failed: {0}")]
    Task(String),
}

impl EngineError {
    pub(crate) fn inconsistency(report: &ReportId, detail: impl Into<String>) -> Self {
        Self::Inconsistency {
            report: report.clone(),
            detail: detail.into(),
        }
    }
}
