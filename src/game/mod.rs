//! Round Logic Module
//!
//! Everything that decides how a round plays out. Deterministic: the driver
//! supplies one signal frame and one timestamp per tick, and all side
//! effects go through the capabilities injected into [`state::GameMachine`].
//!
//! ## Module Structure
//!
//! - `signal`: contact channels, per-tick sampling, scripted replay source
//! - `state`: game phases, live round state, read-only snapshots
//! - `tick`: the per-tick transition function
//! - `events`: round events handed to feedback and logging

pub mod events;
pub mod signal;
pub mod state;
pub mod tick;

// Re-export key types
pub use events::{RoundEvent, RoundSummary};
pub use signal::{Channel, ScriptedSignals, SignalFrame, SignalSource};
pub use state::{GameConfig, GameMachine, GamePhase, StateSnapshot};
pub use tick::{tick, TickResult};
