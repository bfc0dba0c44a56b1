//! Delayed, cancelable computer moves.

use crate::events::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, instrument};

/// Schedules the computer's move after a pacing delay.
///
/// Every cancel bumps the generation, so a [`AppEvent::ComputerTurn`] that
/// was already queued when the board changed is recognized as stale.
#[derive(Debug)]
pub struct ComputerScheduler {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    events: UnboundedSender<AppEvent>,
}

impl ComputerScheduler {
    /// Creates a scheduler that reports due moves on `events`.
    pub fn new(delay: Duration, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
            events,
        }
    }

    /// Schedules a move, replacing any pending one. Returns its generation.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self), fields(delay_ms = self.delay.as_millis() as u64))]
    pub fn schedule(&mut self) -> u64 {
        self.cancel();
        let generation = self.generation;
        let delay = self.delay;
        let events = self.events.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = events.send(AppEvent::ComputerTurn { generation });
        }));
        debug!(generation, "Computer move scheduled");
        generation
    }

    /// Drops any pending move.
    #[instrument(skip(self))]
    pub fn cancel(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
            debug!(generation = self.generation, "Pending computer move canceled");
        }
    }

    /// Claims a due move. False when `generation` was canceled since.
    #[instrument(skip(self))]
    pub fn accept(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.pending.is_some() {
            self.pending = None;
            true
        } else {
            debug!(current = self.generation, "Ignoring stale computer move");
            false
        }
    }

    /// True while a move is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for ComputerScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
