//! smoke — smallest runnable example for the taxi shuttle simulator.
//!
//! Four people commute across a 4-branch line; the trace prints to the
//! console at the classic pacing (33 ms of real time per simulated minute).
//! Swap the inline CSV for `load_roster_csv` on a real file to run your own
//! population.

use std::io::Cursor;
use std::time::Instant;

use anyhow::Result;

use taxi_core::SimConfig;
use taxi_roster::load_roster_reader;
use taxi_sim::{ConsoleSink, SimulationBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const BRANCH_COUNT: u16 = 4;
const SEED:         u64 = 42;

// ── Roster CSV ────────────────────────────────────────────────────────────────

// One row per itinerary leg: actor_id,destination,dwell_minutes.
const ROSTER_CSV: &str = "\
actor_id,destination,dwell_minutes\n\
0,2,10\n\
0,1,5\n\
1,3,20\n\
1,0,5\n\
2,1,8\n\
3,3,12\n\
3,2,6\n\
";

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let roster = load_roster_reader(Cursor::new(ROSTER_CSV), BRANCH_COUNT)?;
    let population = roster.len();

    let mut config = SimConfig::new(BRANCH_COUNT);
    config.seed = SEED;

    let started = Instant::now();
    let sim = SimulationBuilder::new(config, roster)
        .sink(Box::new(ConsoleSink))
        .start()?;
    sim.join()?;

    println!(
        "{population} people served across {BRANCH_COUNT} branches in {:.2?}",
        started.elapsed()
    );
    Ok(())
}
