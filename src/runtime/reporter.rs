//! Periodic Status Reporter
//!
//! Low-frequency liveness logging. Runs on its own schedule and only ever
//! reads the snapshot channel - it cannot touch the machine, so there is
//! nothing to tear.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::game::state::StateSnapshot;

/// Log the latest snapshot every `period` until the driver goes away.
pub async fn status_reporter(mut rx: watch::Receiver<StateSnapshot>, period: Duration) {
    let mut cadence = interval(period);
    cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        cadence.tick().await;

        let snapshot: StateSnapshot = *rx.borrow_and_update();
        info!(
            phase = snapshot.phase.name(),
            touch_count = snapshot.touch_count,
            elapsed_ms = snapshot.elapsed.map(|e| e.as_millis() as u64),
            tick = snapshot.tick,
            "status"
        );

        // Sender dropped means the driver is gone; stop reporting.
        if rx.has_changed().is_err() {
            return;
        }
    }
}
