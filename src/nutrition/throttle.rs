// ABOUTME: Quota-aware throttle that suspends upstream calls when the remaining quota runs low
// ABOUTME: Trips on a low x-ratelimit-remaining report and reopens after a fixed cooldown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Upstream quota throttle
//!
//! A two-state machine, `Open -> Throttled -> Open`. Each upstream reply
//! reports its remaining quota; the first report below the safety threshold
//! trips the throttle and spawns exactly one timer that reopens it after the
//! cooldown. Reports received while throttled change nothing.
//!
//! The state is process-local and starts open.

use crate::config::ThrottleConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct ThrottleState {
    throttled: bool,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    reset_task: Option<JoinHandle<()>>,
}

impl ThrottleState {
    fn reopen(&mut self) {
        self.throttled = false;
        self.since = None;
        self.until = None;
        self.reset_task = None;
    }
}

/// Serializable snapshot of the throttle for health reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleStatus {
    /// Whether upstream calls are currently suspended
    pub throttled: bool,
    /// When the current suspension started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttled_since: Option<DateTime<Utc>>,
    /// When the current suspension is scheduled to end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttled_until: Option<DateTime<Utc>>,
    /// Remaining-quota value that trips the throttle
    pub safety_threshold: u32,
    /// Suspension length in seconds
    pub cooldown_secs: u64,
}

/// Upstream call gate driven by reported quota
#[derive(Debug)]
pub struct ThrottleController {
    safety_threshold: u32,
    cooldown: Duration,
    state: Arc<Mutex<ThrottleState>>,
}

fn lock(state: &Mutex<ThrottleState>) -> MutexGuard<'_, ThrottleState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ThrottleController {
    /// Create an open throttle
    #[must_use]
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            safety_threshold: config.safety_threshold,
            cooldown: config.cooldown,
            state: Arc::new(Mutex::new(ThrottleState::default())),
        }
    }

    /// Whether upstream calls are currently suspended
    #[must_use]
    pub fn is_throttled(&self) -> bool {
        lock(&self.state).throttled
    }

    /// Feed the remaining quota from an upstream reply
    ///
    /// Returns `true` when this report tripped the throttle. Must be called
    /// from within a Tokio runtime, since tripping spawns the reset timer.
    pub fn report_quota(&self, remaining: Option<u32>) -> bool {
        let Some(remaining) = remaining else {
            return false;
        };
        if remaining >= self.safety_threshold {
            return false;
        }

        let mut state = lock(&self.state);
        if state.throttled {
            debug!(remaining, "Quota report while already throttled, ignoring");
            return false;
        }

        let now = Utc::now();
        state.throttled = true;
        state.since = Some(now);
        state.until = chrono::Duration::from_std(self.cooldown)
            .ok()
            .and_then(|cooldown| now.checked_add_signed(cooldown));
        state.reset_task = Some(Self::spawn_reset(
            Arc::downgrade(&self.state),
            self.cooldown,
        ));

        warn!(
            remaining,
            threshold = self.safety_threshold,
            cooldown_secs = self.cooldown.as_secs(),
            "Upstream quota below safety threshold, suspending upstream calls"
        );
        true
    }

    fn spawn_reset(state: Weak<Mutex<ThrottleState>>, cooldown: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            if let Some(state) = state.upgrade() {
                lock(&state).reopen();
                info!("Throttle cooldown elapsed, resuming upstream calls");
            }
        })
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn status(&self) -> ThrottleStatus {
        let state = lock(&self.state);
        ThrottleStatus {
            throttled: state.throttled,
            throttled_since: state.since,
            throttled_until: state.until,
            safety_threshold: self.safety_threshold,
            cooldown_secs: self.cooldown.as_secs(),
        }
    }
}

impl Drop for ThrottleController {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.state).reset_task.take() {
            task.abort();
        }
    }
}
