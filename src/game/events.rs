//! Round Events
//!
//! Events fired by the machine as a round progresses. Each one corresponds
//! to a transition hook: the machine hands it to the injected feedback sink
//! in-line with the transition, and the driver logs the copies returned in
//! [`TickResult`](crate::game::tick::TickResult).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome context for a completed round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Wire contacts scored during the round
    pub touch_count: u32,
    /// Time from arming to the finish plate
    pub elapsed: Duration,
    /// 1-based leaderboard position, if the record was persisted
    pub rank: Option<u32>,
    /// Leaderboard size after this round, if the record was persisted
    pub total: Option<u32>,
}

impl RoundSummary {
    /// Elapsed time in whole milliseconds (truncated).
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// A round event, fired in-line with the transition that caused it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// Loop parked on the start plate; round armed
    GetReady,
    /// Loop lifted off the start plate; the clock is running
    Go,
    /// Wire contact scored
    Touch {
        /// Running contact count including this touch
        touch_count: u32,
    },
    /// Finish plate reached; record saved (rank present) or save failed
    Finished {
        /// Final round outcome
        summary: RoundSummary,
    },
    /// Round timed out and was discarded
    Aborted {
        /// Time spent in the round before the timeout fired
        elapsed: Duration,
    },
}

impl RoundEvent {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            RoundEvent::GetReady => "get_ready",
            RoundEvent::Go => "go",
            RoundEvent::Touch { .. } => "touch",
            RoundEvent::Finished { .. } => "finished",
            RoundEvent::Aborted { .. } => "aborted",
        }
    }

    /// Create a touch event.
    pub fn touch(touch_count: u32) -> Self {
        RoundEvent::Touch { touch_count }
    }

    /// Create a finished event.
    pub fn finished(
        touch_count: u32,
        elapsed: Duration,
        ranking: Option<crate::store::Ranking>,
    ) -> Self {
        RoundEvent::Finished {
            summary: RoundSummary {
                touch_count,
                elapsed,
                rank: ranking.map(|r| r.rank),
                total: ranking.map(|r| r.total),
            },
        }
    }

    /// Create an aborted event.
    pub fn aborted(elapsed: Duration) -> Self {
        RoundEvent::Aborted { elapsed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Ranking;

    #[test]
    fn test_finished_event_carries_ranking() {
        let event = RoundEvent::finished(
            2,
            Duration::from_millis(12_340),
            Some(Ranking { rank: 3, total: 17 }),
        );

        match event {
            RoundEvent::Finished { summary } => {
                assert_eq!(summary.touch_count, 2);
                assert_eq!(summary.elapsed_ms(), 12_340);
                assert_eq!(summary.rank, Some(3));
                assert_eq!(summary.total, Some(17));
            }
            other => panic!("expected finished event, got {other:?}"),
        }
    }

    #[test]
    fn test_finished_event_without_ranking() {
        let event = RoundEvent::finished(0, Duration::from_secs(5), None);
        match event {
            RoundEvent::Finished { summary } => {
                assert_eq!(summary.rank, None);
                assert_eq!(summary.total, None);
            }
            other => panic!("expected finished event, got {other:?}"),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(RoundEvent::GetReady.label(), "get_ready");
        assert_eq!(RoundEvent::touch(1).label(), "touch");
        assert_eq!(RoundEvent::aborted(Duration::ZERO).label(), "aborted");
    }
}
