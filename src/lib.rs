//! # Buzzwire Game Controller
//!
//! Round controller and leaderboard for a physical buzzwire reflex game:
//! a player guides a metal loop along a bent wire from a start plate to a
//! finish plate, and every wire contact counts as an error.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         BUZZWIRE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  game/           - Round logic (deterministic)              │
//! │  ├── signal.rs   - Contact channels and per-tick sampling   │
//! │  ├── state.rs    - Game phases, round state, snapshots      │
//! │  ├── tick.rs     - Per-tick transition function             │
//! │  └── events.rs   - Round events for feedback and logging    │
//! │                                                             │
//! │  store/          - Leaderboard persistence                  │
//! │  ├── key.rs      - Sortable record-key codec                │
//! │  ├── dir.rs      - One marker file per finished round       │
//! │  └── memory.rs   - In-memory store for tests and demos      │
//! │                                                             │
//! │  feedback/       - Lights and speech (interface only)       │
//! │                                                             │
//! │  runtime/        - Polling driver loop (non-deterministic)  │
//! │  ├── driver.rs   - Fixed-cadence sample-and-tick loop       │
//! │  └── reporter.rs - Periodic status logging over snapshots   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Boundary
//!
//! The `game/` module never reads a clock or touches I/O: the driver hands
//! it one [`SignalFrame`](game::signal::SignalFrame) and one monotonic
//! timestamp per tick, and it calls out only through the injected
//! [`RecordStore`](store::RecordStore) and
//! [`FeedbackSink`](feedback::FeedbackSink) capabilities. Given the same
//! frame/timestamp sequence, a round plays out identically - which is what
//! makes the transition table testable tick by tick.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod feedback;
pub mod game;
pub mod runtime;
pub mod store;

// Re-export commonly used types
pub use feedback::{BlinkPattern, FeedbackSink, TracingFeedback};
pub use game::events::{RoundEvent, RoundSummary};
pub use game::signal::{Channel, ScriptedSignals, SignalFrame, SignalSource};
pub use game::state::{GameConfig, GameMachine, GamePhase, StateSnapshot};
pub use game::tick::{tick, TickResult};
pub use store::{DirRecordStore, MemoryRecordStore, Ranking, RecordStore};

use std::time::Duration;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Driver polling rate (Hz)
pub const TICK_RATE: u32 = 20;

/// Driver polling period (50 ms; short enough that no physical contact can
/// begin and end between two samples)
pub const TICK_PERIOD: Duration = Duration::from_millis(1000 / TICK_RATE as u64);

/// A round stuck in the started phase longer than this is aborted
pub const ROUND_TIMEOUT: Duration = Duration::from_secs(60);
