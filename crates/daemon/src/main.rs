// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debrief daemon (debriefd)
//!
//! Background process that drives the report workflow sweeps: approval
//! timeouts, publication quarantine, and engagement date
//! reconciliation. Each worker runs on its own interval; a worker is
//! never re-entered because its interval arm awaits the run to
//! completion before the loop selects again.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;

use std::path::{Path, PathBuf};

use tokio::signal::unix::{signal, SignalKind};
use tokio::time::MissedTickBehavior;
use tracing::info;

use debrief_adapters::{FixedConfig, MemAudit, MemNotify, MemSearch, MemStore};
use debrief_core::SystemClock;
use debrief_engine::{
    ApprovalTimeoutWorker, EngagementDateReconciliationWorker, Env, MemRunLedger,
    PublicationQuarantineWorker, WorkerRunner,
};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("debrief.toml")
    };
    let config = Config::load(&config_path)?;

    // Guard must outlive the loop or buffered log lines are lost
    let _log_guard = setup_logging(config.log_dir.as_deref())?;

    info!(config = %config_path.display(), "starting debriefd");

    let clock = SystemClock;
    let store = MemStore::new();
    let env = Env {
        search: MemSearch::new(store.clone()),
        store,
        notify: MemNotify::new(),
        audit: MemAudit::new(),
        config: FixedConfig::new(
            config.hours.approval_timeout,
            config.hours.publication_quarantine,
        ),
        clock: clock.clone(),
    };
    let ledger = MemRunLedger::new();

    let approval = WorkerRunner::new(
        ApprovalTimeoutWorker::new(env.clone()),
        ledger.clone(),
        clock.clone(),
    );
    let publication = WorkerRunner::new(
        PublicationQuarantineWorker::new(env.clone()),
        ledger.clone(),
        clock.clone(),
    );
    let engagement = WorkerRunner::new(
        EngagementDateReconciliationWorker::new(env.clone()),
        ledger.clone(),
        clock.clone(),
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let mut approval_tick = tokio::time::interval(config.intervals.approval_timeout);
    let mut publication_tick = tokio::time::interval(config.intervals.publication_quarantine);
    let mut engagement_tick = tokio::time::interval(config.intervals.engagement_reconciliation);
    for tick in [
        &mut approval_tick,
        &mut publication_tick,
        &mut engagement_tick,
    ] {
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    }

    info!("debriefd ready");

    loop {
        tokio::select! {
            _ = approval_tick.tick() => {
                approval.run().await;
            }
            _ = publication_tick.tick() => {
                publication.run().await;
            }
            _ = engagement_tick.tick() => {
                engagement.run().await;
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    info!("debriefd stopped");
    Ok(())
}

fn setup_logging(
    log_dir: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, "debriefd.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
            Ok(None)
        }
    }
}
