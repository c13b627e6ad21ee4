//! CSV roster loader.
//!
//! # CSV format
//!
//! One row per itinerary leg.  Rows for the same actor are consumed in file
//! order (the first row is the first destination).
//!
//! ```csv
//! actor_id,destination,dwell_minutes
//! 0,2,10
//! 0,1,5
//! 1,3,20
//! ```
//!
//! The branch count is not part of the file; the caller supplies it and the
//! resulting [`Roster`] is validated against it, so every configuration
//! error is caught here rather than mid-simulation.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use taxi_core::{ActorId, BranchId};

use crate::itinerary::{Itinerary, Leg, Roster, RosterEntry};
use crate::RosterError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LegRecord {
    actor_id:      u32,
    destination:   u16,
    dwell_minutes: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Roster`] from a CSV file and validate it against `branch_count`.
pub fn load_roster_csv(path: &Path, branch_count: u16) -> Result<Roster, RosterError> {
    let file = std::fs::File::open(path).map_err(RosterError::Io)?;
    load_roster_reader(file, branch_count)
}

/// Like [`load_roster_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from streams.
pub fn load_roster_reader<R: Read>(
    reader: R,
    branch_count: u16,
) -> Result<Roster, RosterError> {
    // ── Parse CSV rows, preserving per-actor row order ────────────────────
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_actor: HashMap<u32, Vec<Leg>> = HashMap::new();
    let mut first_seen: Vec<u32> = Vec::new();

    for result in csv_reader.deserialize::<LegRecord>() {
        let row = result.map_err(|e| RosterError::Parse(e.to_string()))?;
        let legs = by_actor.entry(row.actor_id).or_insert_with(|| {
            first_seen.push(row.actor_id);
            Vec::new()
        });
        legs.push(Leg::new(BranchId(row.destination), row.dwell_minutes));
    }

    // ── Build one RosterEntry per actor, in file order ────────────────────
    let entries: Vec<RosterEntry> = first_seen
        .into_iter()
        .map(|id| {
            let legs = by_actor.remove(&id).unwrap_or_default();
            RosterEntry::new(ActorId(id), Itinerary::new(legs))
        })
        .collect();

    Roster::new(branch_count, entries)
}
