//! Game Phases and Round State
//!
//! The live state owned by the driver loop: current phase, the round in
//! flight (if any), and the capabilities the machine calls out through.
//! All mutation happens in [`tick`](crate::game::tick::tick); everything
//! else reads consistent snapshots.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::feedback::{BlinkPattern, FeedbackSink};
use crate::game::events::RoundEvent;
use crate::store::RecordStore;
use crate::ROUND_TIMEOUT;

// =============================================================================
// GAME PHASE
// =============================================================================

/// Phase of the game loop.
///
/// `Waiting → AboutToStart → Started → Touched → Finished → Waiting`, with
/// `Touched → Started` after the contact clears and `Started → AboutToStart`
/// on a start re-trigger. Timeout in `Started` falls back to `Waiting`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle; no loop on the course
    #[default]
    Waiting,
    /// Loop parked on the start plate, round armed
    AboutToStart,
    /// Round running, no wire contact at the moment
    Started,
    /// Wire currently contacted; the touch has been counted
    Touched,
    /// Finish plate reached; record written, results announced
    Finished,
}

impl GamePhase {
    /// Lower-case phase name used in logs and status reports.
    pub fn name(self) -> &'static str {
        match self {
            GamePhase::Waiting => "waiting",
            GamePhase::AboutToStart => "about_to_start",
            GamePhase::Started => "started",
            GamePhase::Touched => "touched",
            GamePhase::Finished => "finished",
        }
    }

    /// True while a round is in flight (between arming and completion).
    pub fn round_active(self) -> bool {
        matches!(
            self,
            GamePhase::AboutToStart | GamePhase::Started | GamePhase::Touched
        )
    }
}

// =============================================================================
// ROUND
// =============================================================================

/// The live, mutable round session.
///
/// Created on entering `AboutToStart`, dropped on the way back to `Waiting`.
#[derive(Clone, Copy, Debug)]
pub struct Round {
    /// Wire contacts counted so far; one per assert→de-assert cycle
    pub touch_count: u32,
    /// Monotonic timestamp captured when the round was armed
    pub started_at: Instant,
}

impl Round {
    /// Arm a fresh round at `now`.
    pub fn armed_at(now: Instant) -> Self {
        Self {
            touch_count: 0,
            started_at: now,
        }
    }

    /// Time since the round was armed.
    ///
    /// `now` earlier than `started_at` is a logic bug (timestamps must come
    /// from the driver's single clock); it trips the debug assertion and
    /// clamps to zero in release builds.
    pub fn elapsed(&self, now: Instant) -> Duration {
        debug_assert!(
            now >= self.started_at,
            "tick timestamp predates round start"
        );
        now.saturating_duration_since(self.started_at)
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Tunables for round evaluation.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    /// Time in `Started` after which the round is aborted
    pub round_timeout: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_timeout: ROUND_TIMEOUT,
        }
    }
}

// =============================================================================
// STATE SNAPSHOT
// =============================================================================

/// Immutable copy of the machine's observable state.
///
/// Handed to background readers (status reporter) so nothing outside the
/// driver loop ever touches the mutable machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Current phase
    pub phase: GamePhase,
    /// Touch count of the round in flight (0 when idle)
    pub touch_count: u32,
    /// Time since the round in flight was armed (None when idle)
    pub elapsed: Option<Duration>,
    /// Ticks processed since the machine was created
    pub tick: u64,
}

// =============================================================================
// GAME MACHINE
// =============================================================================

/// The game state machine.
///
/// Owns the phase and round state plus the two injected capabilities: the
/// record store (called exactly once per completed round) and the feedback
/// sink (announcements and blink patterns, fire-and-forget). One logical
/// owner - the driver loop - mutates it; there is no internal
/// synchronization.
pub struct GameMachine {
    /// Current phase
    pub(crate) phase: GamePhase,
    /// Round in flight, if any
    pub(crate) round: Option<Round>,
    /// Ticks processed so far
    pub(crate) tick: u64,
    /// Round evaluation tunables
    pub(crate) config: GameConfig,
    /// Leaderboard persistence
    pub(crate) store: Box<dyn RecordStore + Send>,
    /// Lights and speech
    pub(crate) sink: Box<dyn FeedbackSink + Send>,
    /// Events fired this tick (drained into the tick result)
    pub(crate) pending_events: Vec<RoundEvent>,
}

impl GameMachine {
    /// Create a machine in `Waiting` with injected capabilities.
    pub fn new(
        config: GameConfig,
        store: Box<dyn RecordStore + Send>,
        sink: Box<dyn FeedbackSink + Send>,
    ) -> Self {
        let mut machine = Self {
            phase: GamePhase::Waiting,
            round: None,
            tick: 0,
            config,
            store,
            sink,
            pending_events: Vec::new(),
        };
        machine.sink.set_pattern(BlinkPattern::for_phase(machine.phase));
        machine
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Touch count of the round in flight (0 when idle).
    pub fn touch_count(&self) -> u32 {
        self.round.map(|r| r.touch_count).unwrap_or(0)
    }

    /// Consistent copy of the observable state for background readers.
    pub fn snapshot(&self, now: Instant) -> StateSnapshot {
        StateSnapshot {
            phase: self.phase,
            touch_count: self.touch_count(),
            elapsed: self
                .round
                .filter(|_| self.phase.round_active())
                .map(|r| r.elapsed(now)),
            tick: self.tick,
        }
    }

    /// Fire an event: announce through the sink in-line, keep a copy for
    /// the tick result.
    pub(crate) fn fire(&mut self, event: RoundEvent) {
        self.sink.announce(&event);
        self.pending_events.push(event);
    }

    /// Switch phase and push the matching blink pattern to the sink.
    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.sink.set_pattern(BlinkPattern::for_phase(phase));
    }

    /// Drain the events fired this tick.
    pub(crate) fn take_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl std::fmt::Debug for GameMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameMachine")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}
