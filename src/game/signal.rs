//! Contact Channels and Per-Tick Sampling
//!
//! The wire course exposes exactly three binary contact sensors. Hardware
//! concerns (pin mapping, active-low polarity, electrical debounce) live in
//! the adapter behind [`SignalSource`]; by the time a reading reaches this
//! module it is a clean boolean where `true` means "contact asserted".

use serde::{Deserialize, Serialize};

// =============================================================================
// CHANNELS
// =============================================================================

/// Logical contact channel on the wire course.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Channel {
    /// Start plate - loop parked at the beginning of the course
    Start = 0,
    /// The wire itself - any contact is an error
    Touch = 1,
    /// Finish plate - loop reached the end of the course
    Finish = 2,
}

impl Channel {
    /// All channels, in sampling order.
    pub const ALL: [Channel; 3] = [Channel::Start, Channel::Touch, Channel::Finish];

    /// Lower-case label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Channel::Start => "start",
            Channel::Touch => "touch",
            Channel::Finish => "finish",
        }
    }
}

// =============================================================================
// SIGNAL SOURCE
// =============================================================================

/// Source of debounced contact readings.
///
/// Implementations wrap the physical sensors (or a script, in tests). A read
/// must not fail from the machine's point of view: adapters map hardware
/// faults to `false` and report them out-of-band.
pub trait SignalSource {
    /// Current state of one channel. `true` = contact asserted.
    fn read(&mut self, channel: Channel) -> bool;

    /// Sample one coherent frame for this tick.
    ///
    /// Live sources use the default (three reads back to back); replay
    /// sources override it to advance their script exactly once per tick.
    fn next_frame(&mut self) -> SignalFrame
    where
        Self: Sized,
    {
        SignalFrame::sample(self)
    }
}

// =============================================================================
// SIGNAL FRAME
// =============================================================================

/// One coherent snapshot of all three channels, taken once per tick.
///
/// The machine only ever sees frames, never the live source, so a tick
/// cannot observe two different values for the same channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalFrame {
    /// Start plate contact
    pub start: bool,
    /// Wire contact
    pub touch: bool,
    /// Finish plate contact
    pub finish: bool,
}

impl SignalFrame {
    /// Frame with no channel asserted.
    pub const IDLE: SignalFrame = SignalFrame {
        start: false,
        touch: false,
        finish: false,
    };

    /// Build a frame from explicit channel states.
    pub const fn new(start: bool, touch: bool, finish: bool) -> Self {
        Self { start, touch, finish }
    }

    /// Sample all channels from a source.
    pub fn sample<S: SignalSource + ?Sized>(source: &mut S) -> Self {
        Self {
            start: source.read(Channel::Start),
            touch: source.read(Channel::Touch),
            finish: source.read(Channel::Finish),
        }
    }

    /// State of one channel within this frame.
    pub fn get(&self, channel: Channel) -> bool {
        match channel {
            Channel::Start => self.start,
            Channel::Touch => self.touch,
            Channel::Finish => self.finish,
        }
    }

    /// True if any channel is asserted.
    pub fn any(&self) -> bool {
        self.start || self.touch || self.finish
    }
}

// =============================================================================
// SCRIPTED SOURCE
// =============================================================================

/// Replays a fixed sequence of frames, one per tick; idle after exhaustion.
///
/// Used by the demo binary and the test suite to drive whole rounds without
/// hardware.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSignals {
    frames: Vec<SignalFrame>,
    cursor: usize,
}

impl ScriptedSignals {
    /// Create a script from a frame sequence.
    pub fn new(frames: Vec<SignalFrame>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Number of frames remaining before the script goes idle.
    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.cursor)
    }

    /// True once every scripted frame has been consumed.
    pub fn exhausted(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    /// Advance to the next scripted frame.
    ///
    /// [`SignalFrame::sample`] reads channels one at a time, so the advance
    /// happens here rather than in `read` to keep one frame per tick.
    pub fn step(&mut self) -> SignalFrame {
        let frame = self.frames.get(self.cursor).copied().unwrap_or(SignalFrame::IDLE);
        self.cursor += 1;
        frame
    }
}

impl SignalSource for ScriptedSignals {
    fn read(&mut self, channel: Channel) -> bool {
        self.frames
            .get(self.cursor)
            .copied()
            .unwrap_or(SignalFrame::IDLE)
            .get(channel)
    }

    fn next_frame(&mut self) -> SignalFrame {
        self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_sampling_is_coherent() {
        let mut script = ScriptedSignals::new(vec![
            SignalFrame::new(true, false, false),
            SignalFrame::new(false, true, true),
        ]);

        let first = SignalFrame::sample(&mut script);
        assert_eq!(first, SignalFrame::new(true, false, false));

        // Sampling again without stepping sees the same frame.
        let again = SignalFrame::sample(&mut script);
        assert_eq!(again, first);

        script.step();
        let second = SignalFrame::sample(&mut script);
        assert_eq!(second, SignalFrame::new(false, true, true));
    }

    #[test]
    fn test_script_goes_idle_after_exhaustion() {
        let mut script = ScriptedSignals::new(vec![SignalFrame::new(true, true, true)]);

        assert_eq!(script.step(), SignalFrame::new(true, true, true));
        assert!(script.exhausted());
        assert_eq!(script.step(), SignalFrame::IDLE);
        assert!(!SignalFrame::sample(&mut script).any());
    }

    #[test]
    fn test_channel_accessors_match_fields() {
        let frame = SignalFrame::new(true, false, true);
        assert!(frame.get(Channel::Start));
        assert!(!frame.get(Channel::Touch));
        assert!(frame.get(Channel::Finish));
        assert!(frame.any());
        assert!(!SignalFrame::IDLE.any());
    }

    #[test]
    fn test_channel_labels() {
        for channel in Channel::ALL {
            assert!(!channel.label().is_empty());
        }
        assert_eq!(Channel::Start.label(), "start");
    }
}
