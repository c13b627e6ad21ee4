//! `taxi-sim` — the concurrency core of the taxi shuttle simulator.
//!
//! One shuttle thread sweeps a linearly ordered set of branches in a
//! deterministic triangle pattern while one thread per actor hails it,
//! requests destinations, rides, and dwells.  All coordination runs through
//! a single shuttle-wide lock over three related collections:
//!
//! ```text
//! actor task ── hail ──────────▶ hailed queue
//!                                   │  pick-up phase (branch match)
//!                                   ▼
//! actor task ── request ──────▶ picked-up queue ──▶ requested map
//!                                   │  advance phase: REQUESTED → TRAVELING
//!                                   ▼  discharge phase (destination match)
//!                               back to WAITING, dwell, repeat
//! ```
//!
//! # Crate layout
//!
//! | Module          | Contents                                            |
//! |-----------------|-----------------------------------------------------|
//! | [`actor`]       | `ActorState`, `Actor` (per-actor lock + condvar)    |
//! | [`shuttle`]     | `Shuttle`: queues, sweep phases, snapshot           |
//! | [`task`]        | the per-actor thread loop                           |
//! | [`trace`]       | `TraceEvent`, `TraceSink`, `Tracer`                 |
//! | [`coordinator`] | `SimulationBuilder`, `Simulation`                   |
//! | [`error`]       | `SimError`, `SimResult<T>`                          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use taxi_core::SimConfig;
//! use taxi_roster::load_roster_csv;
//! use taxi_sim::{ConsoleSink, SimulationBuilder};
//!
//! let roster = load_roster_csv("roster.csv".as_ref(), 4)?;
//! let sim = SimulationBuilder::new(SimConfig::new(4), roster)
//!     .sink(Box::new(ConsoleSink))
//!     .start()?;
//! sim.join()?;
//! ```

pub mod actor;
pub mod coordinator;
pub mod error;
pub mod shuttle;
pub mod task;
pub mod trace;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use actor::{Actor, ActorState};
pub use coordinator::{Simulation, SimulationBuilder};
pub use error::{SimError, SimResult};
pub use shuttle::{Direction, Shuttle, ShuttlePhase, ShuttleSnapshot};
pub use trace::{
    ChannelSink, ConsoleSink, MemorySink, TraceEvent, TraceKind, TraceLog, TraceSink, Tracer,
};
