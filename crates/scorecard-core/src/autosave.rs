//! Autosave scheduling: a recurring interval plus a debounce on text edits.
//!
//! The scheduler never touches storage itself. The owner's event loop awaits
//! [`Autosave::due`] next to its input source and saves the draft when it
//! resolves.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::config::AutosaveConfig;

/// Why a save is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveReason {
    /// The recurring interval elapsed.
    Interval,
    /// Text edits went quiet for the debounce period.
    Debounced,
}

#[derive(Debug)]
pub struct Autosave {
    interval: Option<Interval>,
    debounce: Duration,
    deadline: Option<Instant>,
}

impl Autosave {
    /// Must be called from within a tokio runtime.
    pub fn new(config: &AutosaveConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let period = config.interval().max(Duration::from_millis(1));
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval: Some(interval),
            debounce: config.debounce(),
            deadline: None,
        }
    }

    /// A scheduler that never fires.
    pub fn disabled() -> Self {
        Self {
            interval: None,
            debounce: Duration::ZERO,
            deadline: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    /// Record a text edit, restarting the debounce window.
    pub fn note_edit(&mut self) {
        if self.is_enabled() {
            self.deadline = Some(Instant::now() + self.debounce);
        }
    }

    /// A debounced save is waiting.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop a pending debounced save, e.g. after an explicit save.
    pub fn cancel_pending(&mut self) {
        self.deadline = None;
    }

    /// Resolve when the next save is due. Pending forever when disabled.
    ///
    /// Cancel-safe: dropping the future before it resolves loses nothing.
    pub async fn due(&mut self) -> AutosaveReason {
        let Some(interval) = self.interval.as_mut() else {
            return std::future::pending().await;
        };
        let deadline = self.deadline;

        let reason = tokio::select! {
            _ = interval.tick() => AutosaveReason::Interval,
            _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                AutosaveReason::Debounced
            }
        };

        if reason == AutosaveReason::Debounced {
            self.deadline = None;
        }
        tracing::debug!(?reason, "autosave due");
        reason
    }
}
