//! Lights and Speech
//!
//! The machine talks to the player through one capability: a
//! [`FeedbackSink`] that takes announcements and blink patterns,
//! fire-and-forget. Actual LED playback and text-to-speech live in external
//! adapters; this module owns the *words* (announcement text per event) and
//! the *pattern ids* (one per phase), so an adapter is pure playback.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::events::RoundEvent;
use crate::game::state::GamePhase;

// =============================================================================
// BLINK PATTERNS
// =============================================================================

/// Status-light pattern identifier.
///
/// The core only selects a pattern per phase; cadence playback is the
/// adapter's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlinkPattern {
    /// Slow liveness pulse while idle
    Idle = 0,
    /// Solid light while the loop is parked on the start plate
    Armed = 1,
    /// Fast activity blink while a round is running
    Running = 2,
    /// Celebration flicker on the results screen
    Celebrate = 3,
}

impl BlinkPattern {
    /// Pattern shown in a given phase.
    pub fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Waiting => BlinkPattern::Idle,
            GamePhase::AboutToStart => BlinkPattern::Armed,
            GamePhase::Started | GamePhase::Touched => BlinkPattern::Running,
            GamePhase::Finished => BlinkPattern::Celebrate,
        }
    }
}

// =============================================================================
// ANNOUNCEMENT TEXT
// =============================================================================

/// Spoken reactions to a wire touch, cycled by touch count.
///
/// German on purpose - these are the voice lines of the original cabinet.
pub const TOUCH_PHRASES: [&str; 6] = [
    "Autsch, das tat weh",
    "Ujujuj",
    "Ach Du grüne Neune",
    "Alter, pass auf",
    "Vorsicht",
    "Du hast verkackt",
];

/// Voice line for the `n`-th touch of a round (1-based).
pub fn touch_phrase(touch_count: u32) -> &'static str {
    let index = touch_count.saturating_sub(1) as usize % TOUCH_PHRASES.len();
    TOUCH_PHRASES[index]
}

/// Filename-safe slug for a voice line, matching the pre-rendered audio
/// clip names (spaces to underscores, commas dropped, umlauts transcribed).
pub fn phrase_slug(phrase: &str) -> String {
    phrase
        .replace(' ', "_")
        .replace(',', "")
        .replace('ü', "ue")
        .replace('Ü', "Ue")
}

/// Announcement text for a round event.
pub fn announcement(event: &RoundEvent) -> String {
    match event {
        RoundEvent::GetReady => "Get ready!".to_string(),
        RoundEvent::Go => "Go!".to_string(),
        RoundEvent::Touch { touch_count } => touch_phrase(*touch_count).to_string(),
        RoundEvent::Finished { summary } => {
            let seconds = summary.elapsed.as_secs_f64();
            let touches = match summary.touch_count {
                0 => "no touches".to_string(),
                1 => "1 touch".to_string(),
                n => format!("{n} touches"),
            };
            match (summary.rank, summary.total) {
                (Some(rank), Some(total)) => {
                    format!("Finished in {seconds:.2} seconds with {touches}. Rank {rank} of {total}.")
                }
                _ => format!(
                    "Finished in {seconds:.2} seconds with {touches}. The score could not be saved."
                ),
            }
        }
        RoundEvent::Aborted { .. } => "Round abandoned. Park the loop to try again.".to_string(),
    }
}

// =============================================================================
// FEEDBACK SINK
// =============================================================================

/// Lights-and-speech capability injected into the machine.
///
/// Both calls are fire-and-forget: no return value, and implementations
/// absorb their own failures - a dead speaker must never stall or reverse a
/// transition.
pub trait FeedbackSink {
    /// Speak/play the reaction to a round event.
    fn announce(&mut self, event: &RoundEvent);

    /// Switch the status lights to a new pattern.
    fn set_pattern(&mut self, pattern: BlinkPattern);
}

/// Default sink: logs what an audio/LED adapter would play.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn announce(&mut self, event: &RoundEvent) {
        info!(event = event.label(), "{}", announcement(event));
    }

    fn set_pattern(&mut self, pattern: BlinkPattern) {
        debug!(?pattern, "status light pattern");
    }
}

// =============================================================================
// RECORDING SINK
// =============================================================================

/// Capture sink for tests and tooling: remembers every announcement and
/// pattern change, observable through cloned handles.
#[derive(Clone, Debug, Default)]
pub struct RecordingFeedback {
    inner: Arc<Mutex<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    events: Vec<RoundEvent>,
    patterns: Vec<BlinkPattern>,
}

impl RecordingFeedback {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All announced events, in order.
    pub fn events(&self) -> Vec<RoundEvent> {
        self.lock().events.clone()
    }

    /// All pattern changes, in order.
    pub fn patterns(&self) -> Vec<BlinkPattern> {
        self.lock().patterns.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordingInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FeedbackSink for RecordingFeedback {
    fn announce(&mut self, event: &RoundEvent) {
        self.lock().events.push(event.clone());
    }

    fn set_pattern(&mut self, pattern: BlinkPattern) {
        self.lock().patterns.push(pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Ranking;
    use std::time::Duration;

    #[test]
    fn test_pattern_per_phase() {
        assert_eq!(BlinkPattern::for_phase(GamePhase::Waiting), BlinkPattern::Idle);
        assert_eq!(BlinkPattern::for_phase(GamePhase::AboutToStart), BlinkPattern::Armed);
        assert_eq!(BlinkPattern::for_phase(GamePhase::Started), BlinkPattern::Running);
        assert_eq!(BlinkPattern::for_phase(GamePhase::Touched), BlinkPattern::Running);
        assert_eq!(BlinkPattern::for_phase(GamePhase::Finished), BlinkPattern::Celebrate);
    }

    #[test]
    fn test_touch_phrases_cycle() {
        assert_eq!(touch_phrase(1), TOUCH_PHRASES[0]);
        assert_eq!(touch_phrase(6), TOUCH_PHRASES[5]);
        assert_eq!(touch_phrase(7), TOUCH_PHRASES[0]);
        // Defensive: a zero count (impossible through the machine) must not
        // underflow.
        assert_eq!(touch_phrase(0), TOUCH_PHRASES[0]);
    }

    #[test]
    fn test_phrase_slugs_are_filename_safe() {
        assert_eq!(phrase_slug("Autsch, das tat weh"), "Autsch_das_tat_weh");
        assert_eq!(phrase_slug("Ach Du grüne Neune"), "Ach_Du_gruene_Neune");
        for phrase in TOUCH_PHRASES {
            let slug = phrase_slug(phrase);
            assert!(slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }
    }

    #[test]
    fn test_finished_announcement_with_ranking() {
        let event = RoundEvent::finished(
            1,
            Duration::from_millis(12_340),
            Some(Ranking { rank: 3, total: 17 }),
        );
        assert_eq!(
            announcement(&event),
            "Finished in 12.34 seconds with 1 touch. Rank 3 of 17."
        );
    }

    #[test]
    fn test_finished_announcement_without_ranking() {
        let event = RoundEvent::finished(0, Duration::from_secs(9), None);
        assert_eq!(
            announcement(&event),
            "Finished in 9.00 seconds with no touches. The score could not be saved."
        );
    }

    #[test]
    fn test_recording_feedback_shares_state_across_clones() {
        let recorder = RecordingFeedback::new();
        let mut sink: Box<dyn FeedbackSink + Send> = Box::new(recorder.clone());

        sink.announce(&RoundEvent::Go);
        sink.set_pattern(BlinkPattern::Running);

        assert_eq!(recorder.events(), vec![RoundEvent::Go]);
        assert_eq!(recorder.patterns(), vec![BlinkPattern::Running]);
    }
}
