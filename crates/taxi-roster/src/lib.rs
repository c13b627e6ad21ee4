//! `taxi-roster` — the population the simulation runs on.
//!
//! # Crate layout
//!
//! | Module        | Contents                                         |
//! |---------------|--------------------------------------------------|
//! | [`itinerary`] | `Leg`, `Itinerary`, `RosterEntry`, `Roster`      |
//! | [`loader`]    | `load_roster_csv`, `load_roster_reader`          |
//! | [`error`]     | `RosterError`, `RosterResult<T>`                 |
//!
//! # Validation contract
//!
//! Every configuration problem — destination off the line, zero dwell, empty
//! itinerary, duplicate actor, a leg that goes nowhere — is rejected by
//! [`Roster::new`] at load time.  Code downstream (the shuttle, the actor
//! tasks) may therefore assume every itinerary it sees is well-formed and
//! never re-validate mid-simulation.

pub mod error;
pub mod itinerary;
pub mod loader;


pub use error::{RosterError, RosterResult};
pub use itinerary::{Itinerary, Leg, Roster, RosterEntry};
pub use loader::{load_roster_csv, load_roster_reader};
