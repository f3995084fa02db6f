//! Per-Tick Transition Function
//!
//! One call per driver tick: take the sampled signal frame and the current
//! monotonic time, apply the transition table, fire hooks in-line. Within
//! `Started` the guards are evaluated in fixed priority order -
//! re-arm > touch > finish > timeout - so a spurious start re-trigger always
//! voids the rest of the tick, and finishing always beats timing out.

use std::time::Instant;

use tracing::{debug, error, info};

use crate::game::events::RoundEvent;
use crate::game::signal::SignalFrame;
use crate::game::state::{GameMachine, GamePhase, Round};
use crate::store::Ranking;

/// Result of a tick.
#[derive(Debug)]
pub struct TickResult {
    /// Events fired this tick, in firing order
    pub events: Vec<RoundEvent>,
    /// Phase after the tick
    pub phase: GamePhase,
}

/// Advance the machine by one tick.
///
/// # Arguments
///
/// * `machine` - the game state machine (will be mutated)
/// * `frame` - signal snapshot for this tick
/// * `now` - monotonic timestamp for this tick; must come from the driver's
///   single clock and never run backwards
///
/// # Failure semantics
///
/// Collaborator failures (record persistence, feedback) are absorbed here:
/// they are logged and the transition completes regardless. The machine
/// itself only fails on programmer-invariant violations, which trip debug
/// assertions.
pub fn tick(machine: &mut GameMachine, frame: &SignalFrame, now: Instant) -> TickResult {
    machine.tick += 1;

    match machine.phase {
        GamePhase::Waiting => {
            if frame.start {
                arm(machine, now);
            }
        }

        GamePhase::AboutToStart => {
            if !frame.start {
                begin(machine);
            }
        }

        GamePhase::Started => {
            if frame.start {
                // Re-arm: the loop is back on the start plate, so the
                // attempt restarts from scratch.
                arm(machine, now);
            } else if frame.touch {
                score_touch(machine);
            } else if frame.finish {
                finish(machine, now);
            } else if round_elapsed(machine, now) >= machine.config.round_timeout {
                abort(machine, now);
            }
        }

        GamePhase::Touched => {
            if !frame.touch {
                // Contact cleared; back to the running round. No go hook -
                // that fires once per arming only.
                machine.set_phase(GamePhase::Started);
            }
        }

        GamePhase::Finished => {
            // Unconditional: results were handled on entry, this tick just
            // returns the machine to idle.
            machine.round = None;
            machine.set_phase(GamePhase::Waiting);
            debug!("round closed, waiting for the next player");
        }
    }

    TickResult {
        events: machine.take_events(),
        phase: machine.phase,
    }
}

/// Arm a fresh round: reset the touch count, capture the start time.
///
/// Entered both from `Waiting` (new player) and from `Started` (start plate
/// re-triggered mid-round, which voids the attempt).
fn arm(machine: &mut GameMachine, now: Instant) {
    machine.round = Some(Round::armed_at(now));
    machine.set_phase(GamePhase::AboutToStart);
    machine.fire(RoundEvent::GetReady);
    info!("round armed");
}

/// Start plate released: the attempt is live and the clock counts.
fn begin(machine: &mut GameMachine) {
    machine.set_phase(GamePhase::Started);
    machine.fire(RoundEvent::Go);
    info!("round started");
}

/// Wire contact: count it once and hold in `Touched` until it clears.
fn score_touch(machine: &mut GameMachine) {
    let touch_count = match machine.round.as_mut() {
        Some(round) => {
            round.touch_count += 1;
            round.touch_count
        }
        None => {
            debug_assert!(false, "touch scored with no round in flight");
            return;
        }
    };

    machine.set_phase(GamePhase::Touched);
    machine.fire(RoundEvent::touch(touch_count));
    info!(touch_count, "wire touched");
}

/// Finish plate reached: persist the record, announce the result.
///
/// The transition to `Finished` is unconditional even if persistence fails;
/// the score is lost but the game stays playable.
fn finish(machine: &mut GameMachine, now: Instant) {
    let (touch_count, elapsed) = match machine.round.as_ref() {
        Some(round) => (round.touch_count, round.elapsed(now)),
        None => {
            debug_assert!(false, "finish reached with no round in flight");
            machine.set_phase(GamePhase::Waiting);
            return;
        }
    };

    let ranking: Option<Ranking> = match machine.store.save_and_rank(touch_count, elapsed) {
        Ok(ranking) => Some(ranking),
        Err(err) => {
            error!(%err, touch_count, ?elapsed, "failed to persist round record");
            None
        }
    };

    machine.set_phase(GamePhase::Finished);
    machine.fire(RoundEvent::finished(touch_count, elapsed, ranking));
    info!(
        touch_count,
        elapsed_ms = elapsed.as_millis() as u64,
        rank = ranking.map(|r| r.rank),
        total = ranking.map(|r| r.total),
        "round finished"
    );
}

/// Timeout: discard the round, no record written.
fn abort(machine: &mut GameMachine, now: Instant) {
    let elapsed = round_elapsed(machine, now);
    machine.round = None;
    machine.set_phase(GamePhase::Waiting);
    machine.fire(RoundEvent::aborted(elapsed));
    info!(?elapsed, "round took too long, aborted");
}

/// Elapsed time of the round in flight; zero if there is none (which would
/// be a logic bug and trips the assertion in [`Round::elapsed`]).
fn round_elapsed(machine: &GameMachine, now: Instant) -> std::time::Duration {
    debug_assert!(machine.round.is_some(), "active phase with no round");
    machine
        .round
        .map(|round| round.elapsed(now))
        .unwrap_or_default()
}
