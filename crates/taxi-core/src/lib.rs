//! `taxi-core` — foundational types for the taxi shuttle simulator.
//!
//! This crate is a dependency of every other `taxi-*` crate.  It intentionally
//! has no `taxi-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                      |
//! |-----------|-----------------------------------------------|
//! | [`ids`]   | `ActorId`, `BranchId`                         |
//! | [`time`]  | `Clock`, `TimingConfig`, `SimConfig`          |
//! | [`rng`]   | `ActorRng` (per-actor deterministic jitter)   |
//! | [`error`] | `TaxiError`, `TaxiResult`                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TaxiError, TaxiResult};
pub use ids::{ActorId, BranchId};
pub use rng::ActorRng;
pub use time::{Clock, SimConfig, TimingConfig};
