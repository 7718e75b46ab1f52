use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::state::SharedState;

/// Start the periodic pull and the debounced push loops. Both stop when
/// `shutdown` flips to true.
pub fn spawn(state: SharedState, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(pull_loop(state.clone(), shutdown.clone())),
        tokio::spawn(push_loop(state, shutdown)),
    ]
}

async fn pull_loop(state: SharedState, mut shutdown: watch::Receiver<bool>) {
    let period = state.planner.sync().pull_interval();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!("Pull loop started (every {}s)", period.as_secs());

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => {}
        }
        if *shutdown.borrow() || shutdown.has_changed().is_err() {
            break;
        }

        let sync = state.planner.sync();
        if !(sync.is_connected() && sync.auto_sync()) {
            continue;
        }

        if let Err(e) = state.planner.pull().await {
            tracing::warn!("Periodic pull failed: {e}");
        }
    }

    tracing::debug!("Pull loop stopped");
}

async fn push_loop(state: SharedState, mut shutdown: watch::Receiver<bool>) {
    let debouncer = state.planner.sync().debouncer();
    tracing::debug!("Push loop started (debounce {}ms)", debouncer.delay().as_millis());

    loop {
        tokio::select! {
            _ = debouncer.settled() => {}
            _ = shutdown.changed() => {}
        }
        if *shutdown.borrow() || shutdown.has_changed().is_err() {
            break;
        }

        if !state.planner.sync().is_connected() {
            debouncer.cancel();
            continue;
        }

        if let Err(e) = state.planner.flush_pending().await {
            tracing::warn!("Debounced push failed: {e}");
        }
    }

    tracing::debug!("Push loop stopped");
}
