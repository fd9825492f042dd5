//! Recurring driver for the alert generation cycle
//!
//! At most one cycle runs at a time. A tick that arrives while a cycle is
//! still in flight is skipped and logged, never queued.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::alert::{AlertService, CycleReport};

/// Observable scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleState {
    Idle,
    Scanning,
    Completed,
    /// The last cycle finished with at least one failed pass
    Failed,
}

impl CycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => CycleState::Scanning,
            2 => CycleState::Completed,
            3 => CycleState::Failed,
            _ => CycleState::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            CycleState::Idle => 0,
            CycleState::Scanning => 1,
            CycleState::Completed => 2,
            CycleState::Failed => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Another cycle held the run token
    Skipped,
    Completed(CycleReport),
}

pub struct AlertScheduler {
    alerts: AlertService,
    running: AtomicBool,
    state: AtomicU8,
}

/// Releases the run token even if the cycle future is dropped
struct RunToken<'a>(&'a AtomicBool);

impl Drop for RunToken<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AlertScheduler {
    pub fn new(alerts: AlertService) -> Self {
        Self {
            alerts,
            running: AtomicBool::new(false),
            state: AtomicU8::new(CycleState::Idle.as_u8()),
        }
    }

    pub fn state(&self) -> CycleState {
        CycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run one cycle unless one is already in flight
    pub async fn try_run(&self, now: DateTime<Utc>) -> CycleOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Alert cycle still running, skipping overlapping run");
            return CycleOutcome::Skipped;
        }
        let _token = RunToken(&self.running);

        self.set_state(CycleState::Scanning);
        let report = self.alerts.run_cycle(now).await;

        let state = if report.failed_passes().is_empty() {
            CycleState::Completed
        } else {
            CycleState::Failed
        };
        self.set_state(state);

        CycleOutcome::Completed(report)
    }

    /// Tick every `interval` until `shutdown` flips to true or its sender is
    /// dropped. Each cycle runs on its own task so a slow cycle makes the
    /// following ticks skip rather than queue. Cycles still in flight at
    /// shutdown are awaited before the returned task finishes.
    pub fn spawn(self: Arc<Self>, interval: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut in_flight: Vec<JoinHandle<CycleOutcome>> = Vec::new();

            tracing::info!(interval_secs = interval.as_secs(), "Alert scheduler started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        in_flight.retain(|cycle| !cycle.is_finished());
                        let scheduler = Arc::clone(&self);
                        in_flight.push(tokio::spawn(async move {
                            scheduler.try_run(Utc::now()).await
                        }));
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            if !in_flight.is_empty() {
                tracing::info!(cycles = in_flight.len(), "Waiting for in-flight alert cycles");
            }
            for cycle in in_flight {
                if let Err(e) = cycle.await {
                    tracing::error!(error = %e, "Alert cycle task failed");
                }
            }

            tracing::info!("Alert scheduler stopped");
        })
    }

    fn set_state(&self, state: CycleState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }
}
