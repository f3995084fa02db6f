//! Polling Driver Loop
//!
//! Owns the machine and the signal source: every tick period it samples one
//! frame, advances the machine, and publishes a fresh snapshot for
//! background readers. The driver is the machine's single logical owner -
//! nothing else ever mutates it.

use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::game::signal::SignalSource;
use crate::game::state::{GameMachine, StateSnapshot};
use crate::game::tick::{tick, TickResult};
use crate::TICK_PERIOD;

/// Driver configuration.
#[derive(Clone, Copy, Debug)]
pub struct DriverConfig {
    /// Sampling cadence; bounds every transition latency
    pub tick_period: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_period: TICK_PERIOD,
        }
    }
}

/// The sample-and-tick loop.
pub struct Driver<S: SignalSource> {
    machine: GameMachine,
    signals: S,
    config: DriverConfig,
    snapshot_tx: watch::Sender<StateSnapshot>,
}

impl<S: SignalSource> Driver<S> {
    /// Wire a machine to its signal source.
    pub fn new(machine: GameMachine, signals: S, config: DriverConfig) -> Self {
        let (snapshot_tx, _) = watch::channel(machine.snapshot(Instant::now()));
        Self {
            machine,
            signals,
            config,
            snapshot_tx,
        }
    }

    /// Subscribe to state snapshots, one per tick.
    ///
    /// Receivers see a consistent copy; they never touch the machine.
    pub fn snapshots(&self) -> watch::Receiver<StateSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// The wrapped machine (read-only; the loop is the only writer).
    pub fn machine(&self) -> &GameMachine {
        &self.machine
    }

    /// Run forever at the configured cadence.
    pub async fn run(&mut self) {
        self.run_inner(None).await;
    }

    /// Run a bounded number of ticks (demos, tests).
    pub async fn run_for(&mut self, ticks: u64) {
        self.run_inner(Some(ticks)).await;
    }

    async fn run_inner(&mut self, limit: Option<u64>) {
        let mut cadence = interval(self.config.tick_period);
        // A late tick shifts the schedule instead of bursting; contact
        // detection needs even spacing, not catch-up.
        cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut remaining = limit;
        loop {
            if let Some(n) = remaining.as_mut() {
                if *n == 0 {
                    return;
                }
                *n -= 1;
            }

            cadence.tick().await;
            self.step(Instant::now());
        }
    }

    /// One driver iteration: sample, advance, publish.
    fn step(&mut self, now: Instant) -> TickResult {
        let frame = self.signals.next_frame();
        let result = tick(&mut self.machine, &frame, now);

        for event in &result.events {
            debug!(event = event.label(), "round event");
        }
        self.snapshot_tx.send_replace(self.machine.snapshot(now));

        result
    }
}
