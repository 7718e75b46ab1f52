use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, Notify};

/// Observable state of the coalesced push.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DebounceState {
    /// A mutation arrived and has not been flushed yet.
    pub pending: bool,
    /// A flush is running right now.
    pub in_flight: bool,
}

/// Coalesces bursts of mutations into a single delayed flush.
///
/// Every [`touch`](Debouncer::touch) restarts the quiet period; [`settled`]
/// resolves once `delay` passes without another touch. A [`cancel`] drops
/// the pending flush entirely.
///
/// [`settled`]: Debouncer::settled
/// [`cancel`]: Debouncer::cancel
pub struct Debouncer {
    delay: Duration,
    wake: Notify,
    state: watch::Sender<DebounceState>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            wake: Notify::new(),
            state: watch::Sender::new(DebounceState::default()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> DebounceState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<DebounceState> {
        self.state.subscribe()
    }

    pub fn touch(&self) {
        self.state.send_modify(|s| s.pending = true);
        self.wake.notify_one();
    }

    pub fn cancel(&self) {
        self.state.send_modify(|s| s.pending = false);
        self.wake.notify_one();
    }

    fn is_pending(&self) -> bool {
        self.state.borrow().pending
    }

    /// Waits for a touch followed by a full quiet period. Meant for a single
    /// consumer loop.
    pub async fn settled(&self) {
        loop {
            if !self.is_pending() {
                self.wake.notified().await;
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.delay) => {
                    if self.is_pending() {
                        return;
                    }
                }
                _ = self.wake.notified() => {}
            }
        }
    }

    /// Marks the pending work as taken by a flush.
    pub fn begin_flush(&self) {
        self.state.send_modify(|s| {
            s.pending = false;
            s.in_flight = true;
        });
    }

    pub fn finish_flush(&self) {
        self.state.send_modify(|s| s.in_flight = false);
    }
}
