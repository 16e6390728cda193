// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! debriefd configuration
//!
//! Loaded from a TOML file at startup. Every field has a usable
//! default, so a missing file is not an error: an operator can run the
//! daemon bare and tune it later.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// How often each worker wakes up
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Intervals {
    #[serde(with = "humantime_serde")]
    pub approval_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub publication_quarantine: Duration,
    #[serde(with = "humantime_serde")]
    pub engagement_reconciliation: Duration,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            approval_timeout: Duration::from_secs(5 * 60),
            publication_quarantine: Duration::from_secs(5 * 60),
            engagement_reconciliation: Duration::from_secs(10 * 60),
        }
    }
}

/// Workflow deadlines, in hours
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Hours {
    pub approval_timeout: i64,
    pub publication_quarantine: i64,
}

impl Default for Hours {
    fn default() -> Self {
        Self {
            approval_timeout: 48,
            publication_quarantine: 24,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Log to rotating files under this directory; stderr when unset
    pub log_dir: Option<PathBuf>,
    pub intervals: Intervals,
    pub hours: Hours,
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
