//! Itinerary and roster types.
//!
//! An [`Itinerary`] is an ordered list of [`Leg`]s consumed from the front:
//! each leg names the branch the actor wants to be driven to next and how
//! many simulated minutes it stays there after disembarking.  A [`Roster`]
//! bundles the whole population with the branch count and is the single
//! validation gate for configuration errors.

use taxi_core::{ActorId, BranchId};

use crate::{RosterError, RosterResult};

// ── Leg ───────────────────────────────────────────────────────────────────────

/// One itinerary entry: a destination and the dwell after arrival.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Leg {
    /// Branch the actor wants to be driven to.
    pub destination: BranchId,
    /// Simulated minutes the actor stays at `destination` after disembarking.
    pub dwell_minutes: u32,
}

impl Leg {
    pub fn new(destination: BranchId, dwell_minutes: u32) -> Self {
        Self { destination, dwell_minutes }
    }
}

// ── Itinerary ─────────────────────────────────────────────────────────────────

/// An ordered list of legs, consumed front-first as each is completed.
///
/// `Itinerary` itself is a plain container; emptiness and leg contents are
/// checked by [`Roster::new`], which has the branch count in hand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Itinerary {
    legs: Vec<Leg>,
}

impl Itinerary {
    pub fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Read-only view of the legs, front (next destination) first.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Consume into the owned leg list.
    pub fn into_legs(self) -> Vec<Leg> {
        self.legs
    }
}

impl FromIterator<Leg> for Itinerary {
    fn from_iter<I: IntoIterator<Item = Leg>>(iter: I) -> Self {
        Self { legs: iter.into_iter().collect() }
    }
}

// ── RosterEntry / Roster ──────────────────────────────────────────────────────

/// One person in the population.
#[derive(Clone, Debug)]
pub struct RosterEntry {
    pub actor:     ActorId,
    pub itinerary: Itinerary,
}

impl RosterEntry {
    pub fn new(actor: ActorId, itinerary: Itinerary) -> Self {
        Self { actor, itinerary }
    }
}

/// The validated population for one simulation run.
#[derive(Clone, Debug)]
pub struct Roster {
    branch_count: u16,
    entries:      Vec<RosterEntry>,
}

impl Roster {
    /// Validate and construct a roster.
    ///
    /// Rejects (see [`RosterError`]):
    /// - an empty itinerary;
    /// - a destination outside `[0, branch_count)`;
    /// - a zero dwell duration;
    /// - a leg whose destination equals the actor's location at that point
    ///   in the itinerary (origin for the first leg, the previous leg's
    ///   destination afterwards) — such a leg could never be serviced by a
    ///   shuttle that only discharges after moving;
    /// - a duplicate actor ID.
    pub fn new(branch_count: u16, entries: Vec<RosterEntry>) -> RosterResult<Self> {
        let mut seen = std::collections::HashSet::with_capacity(entries.len());

        for entry in &entries {
            if !seen.insert(entry.actor) {
                return Err(RosterError::DuplicateActor { actor: entry.actor });
            }
            if entry.itinerary.is_empty() {
                return Err(RosterError::EmptyItinerary { actor: entry.actor });
            }

            let mut location = BranchId::ORIGIN;
            for leg in entry.itinerary.legs() {
                if leg.destination.0 >= branch_count {
                    return Err(RosterError::BranchOutOfRange {
                        actor: entry.actor,
                        branch: leg.destination,
                        branch_count,
                    });
                }
                if leg.dwell_minutes == 0 {
                    return Err(RosterError::ZeroDwell {
                        actor: entry.actor,
                        destination: leg.destination,
                    });
                }
                if leg.destination == location {
                    return Err(RosterError::SameBranch {
                        actor: entry.actor,
                        branch: leg.destination,
                    });
                }
                location = leg.destination;
            }
        }

        Ok(Self { branch_count, entries })
    }

    #[inline]
    pub fn branch_count(&self) -> u16 {
        self.branch_count
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<RosterEntry> {
        self.entries
    }
}
