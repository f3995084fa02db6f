//! Buzzwire Game Binary
//!
//! Wires the round controller to a directory-backed leaderboard and runs a
//! scripted demo round. On the cabinet, the scripted source is replaced by
//! the GPIO adapter; everything else stays the same.

use std::time::Duration;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use buzzwire::runtime::{status_reporter, Driver, DriverConfig};
use buzzwire::{
    DirRecordStore, GameConfig, GameMachine, ScriptedSignals, SignalFrame, TracingFeedback,
    ROUND_TIMEOUT, TICK_RATE, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Buzzwire v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);
    info!("Round Timeout: {} s", ROUND_TIMEOUT.as_secs());

    demo_round().await;
    Ok(())
}

/// Play one full round from a signal script: park on the start plate, two
/// wire touches on the way, finish plate at the end.
async fn demo_round() {
    info!("=== Starting Demo Round ===");

    let store = DirRecordStore::default_location();
    info!("Records: {}", store.dir().display());

    let machine = GameMachine::new(
        GameConfig::default(),
        Box::new(store),
        Box::new(TracingFeedback),
    );

    let script = demo_script();
    let ticks = script.remaining() as u64 + 2;
    let mut driver = Driver::new(machine, script, DriverConfig::default());

    let reporter = tokio::spawn(status_reporter(
        driver.snapshots(),
        Duration::from_millis(500),
    ));

    driver.run_for(ticks).await;
    info!("=== Demo Round Complete ===");

    drop(driver);
    let _ = reporter.await;
}

/// Frame sequence for the demo round, one frame per tick.
fn demo_script() -> ScriptedSignals {
    let mut frames = Vec::new();
    fn hold(frames: &mut Vec<SignalFrame>, frame: SignalFrame, ticks: usize) {
        frames.extend(std::iter::repeat(frame).take(ticks));
    }

    // Park the loop on the start plate, then lift off.
    hold(&mut frames, SignalFrame::new(true, false, false), 3);
    hold(&mut frames, SignalFrame::IDLE, 5);

    // First wire contact spans several ticks but counts once.
    hold(&mut frames, SignalFrame::new(false, true, false), 3);
    hold(&mut frames, SignalFrame::IDLE, 4);

    // A short second graze.
    hold(&mut frames, SignalFrame::new(false, true, false), 1);
    hold(&mut frames, SignalFrame::IDLE, 4);

    // Finish plate.
    hold(&mut frames, SignalFrame::new(false, false, true), 2);

    ScriptedSignals::new(frames)
}
