use taxi_core::{ActorId, TaxiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] TaxiError),

    #[error("roster is for a {roster}-branch line but config declares {config}")]
    BranchCountMismatch { roster: u16, config: u16 },

    /// An invariant breach: the actor was found in a queue its state says it
    /// cannot be in.  Signals a locking-discipline bug; the affected task
    /// aborts rather than keep mutating shared state.
    #[error("{actor} is already present in the {queue} queue")]
    QueueConflict {
        actor: ActorId,
        queue: &'static str,
    },

    /// An actor with no legs left reached a code path that needs one.
    /// Cannot happen for rosters that passed validation.
    #[error("{actor} has no itinerary leg to request")]
    ItineraryExhausted { actor: ActorId },

    #[error("task {name} panicked")]
    TaskPanicked { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
