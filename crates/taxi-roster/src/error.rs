use taxi_core::{ActorId, BranchId};
use thiserror::Error;

/// Configuration errors, all rejected at roster-load time.
///
/// Nothing in this enum can surface mid-simulation: the shuttle and the actor
/// tasks only ever see itineraries that passed [`Roster::new`][crate::Roster::new].
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("{actor} has an empty itinerary")]
    EmptyItinerary { actor: ActorId },

    #[error("{actor} wants {branch} but the line has {branch_count} branches")]
    BranchOutOfRange {
        actor:        ActorId,
        branch:       BranchId,
        branch_count: u16,
    },

    #[error("{actor} has a zero dwell duration at {destination}")]
    ZeroDwell {
        actor:       ActorId,
        destination: BranchId,
    },

    #[error("{actor} has a leg that starts and ends at {branch}")]
    SameBranch { actor: ActorId, branch: BranchId },

    #[error("duplicate roster entry for {actor}")]
    DuplicateActor { actor: ActorId },

    #[error("roster parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RosterResult<T> = Result<T, RosterError>;
