//! Simulated time model.
//!
//! # Design
//!
//! The simulation runs on *simulated minutes*: every dwell, travel leg, and
//! pause is expressed in minutes, and [`TimingConfig::real`] maps a minute
//! count to the wall-clock `Duration` the owning thread actually sleeps.
//! Setting `millis_per_minute` to 0 makes every sleep zero-length, which is
//! how the test suites run whole simulations in microseconds.
//!
//! [`Clock`] is the *observable* time: a wall-clock-like `hour:minute` label
//! that advances by a fixed increment per traced event (not per real tick),
//! so the trace timeline is deterministic regardless of scheduling.

use std::fmt;
use std::time::Duration;

use crate::{TaxiError, TaxiResult};

// ── Clock ─────────────────────────────────────────────────────────────────────

/// The simulated wall clock stamped onto every trace event.
///
/// Minute overflow at 60 rolls into the hour; hour overflow at 24 wraps to 0.
/// Mutated only by the trace-emission path, so consecutive trace lines carry
/// monotonically increasing labels (modulo the midnight wrap).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clock {
    hour:   u32,
    minute: u32,
}

impl Clock {
    /// Create a clock reading `start_hour:00`.
    ///
    /// `start_hour` is taken modulo 24 so any input is a valid clock face.
    pub fn new(start_hour: u32) -> Self {
        Self { hour: start_hour % 24, minute: 0 }
    }

    /// Advance the clock by `minutes` simulated minutes.
    pub fn advance(&mut self, minutes: u32) {
        self.minute += minutes;
        self.hour = (self.hour + self.minute / 60) % 24;
        self.minute %= 60;
    }

    #[inline]
    pub fn hour(&self) -> u32 {
        self.hour
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// The `h:m` label used in trace lines, e.g. `9:1`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hour, self.minute)
    }
}

// ── TimingConfig ──────────────────────────────────────────────────────────────

/// Every timing constant in the simulation, in one place.
///
/// The defaults reproduce the classic pacing: 33 ms of real time per
/// simulated minute, 1 minute to pick up or discharge, 2 minutes between
/// branches.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Real milliseconds one simulated minute takes.  0 disables all sleeps
    /// (useful for tests).
    pub millis_per_minute: u64,

    /// Simulated minutes the shuttle dwells at a stop while picking up.
    pub pickup_dwell_minutes: u32,

    /// Simulated minutes one branch-to-branch leg takes.
    pub travel_minutes: u32,

    /// Simulated minutes the shuttle pauses between full sweep cycles.
    pub cycle_pause_minutes: u32,

    /// Upper bound (inclusive) on the randomized interval an actor task
    /// waits between polls of its own state.  Must be ≥ 1.
    pub poll_jitter_minutes: u32,

    /// Clock-face hour the simulation starts at.
    pub clock_start_hour: u32,

    /// Minutes the [`Clock`] advances per traced event.  Must be ≥ 1.
    pub clock_minutes_per_event: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            millis_per_minute:       33,
            pickup_dwell_minutes:    1,
            travel_minutes:          2,
            cycle_pause_minutes:     1,
            poll_jitter_minutes:     1,
            clock_start_hour:        9,
            clock_minutes_per_event: 1,
        }
    }
}

impl TimingConfig {
    /// A config with all sleeps disabled — simulations complete as fast as
    /// the scheduler allows.  Intended for tests.
    pub fn instant() -> Self {
        Self { millis_per_minute: 0, ..Self::default() }
    }

    /// The real `Duration` that `minutes` simulated minutes take.
    #[inline]
    pub fn real(&self, minutes: u32) -> Duration {
        Duration::from_millis(self.millis_per_minute * minutes as u64)
    }

    /// Construct the [`Clock`] this config describes.
    pub fn make_clock(&self) -> Clock {
        Clock::new(self.clock_start_hour)
    }

    pub fn validate(&self) -> TaxiResult<()> {
        if self.poll_jitter_minutes == 0 {
            return Err(TaxiError::Config(
                "poll_jitter_minutes must be ≥ 1".into(),
            ));
        }
        if self.clock_minutes_per_event == 0 {
            return Err(TaxiError::Config(
                "clock_minutes_per_event must be ≥ 1".into(),
            ));
        }
        if self.clock_start_hour >= 24 {
            return Err(TaxiError::Config(format!(
                "clock_start_hour {} is not a clock-face hour",
                self.clock_start_hour
            )));
        }
        Ok(())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Number of stops on the line, including the origin.  Must be ≥ 2; a
    /// one-branch line has nowhere for the shuttle to go.
    pub branch_count: u16,

    /// Master RNG seed.  The same seed produces the same actor-task jitter.
    pub seed: u64,

    /// All timing constants.
    pub timing: TimingConfig,
}

impl SimConfig {
    pub fn new(branch_count: u16) -> Self {
        Self {
            branch_count,
            seed: 0,
            timing: TimingConfig::default(),
        }
    }

    /// Index of the last branch on the line.
    #[inline]
    pub fn last_branch(&self) -> u16 {
        self.branch_count - 1
    }

    pub fn validate(&self) -> TaxiResult<()> {
        if self.branch_count < 2 {
            return Err(TaxiError::Config(format!(
                "branch_count {} — a line needs at least 2 branches",
                self.branch_count
            )));
        }
        self.timing.validate()
    }
}
