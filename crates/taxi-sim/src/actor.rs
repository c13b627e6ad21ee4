//! The per-actor state machine.
//!
//! # Lifecycle
//!
//! ```text
//! WAITING ─hail─▶ HAILED ─pick-up─▶ PICKED_UP ─request─▶ REQUESTED
//!    ▲                                                       │ advance
//!    └────────────── discharge ◀── TRAVELING ◀───────────────┘
//! ```
//!
//! One full cycle consumes one itinerary leg; the owning task ends when the
//! itinerary empties.  No other transitions are legal.  Sweep phases that
//! observe an actor in a state inconsistent with the operation simply skip
//! it — that filtering is what keeps concurrent phases idempotent.
//!
//! # Locking
//!
//! `state`, `current_branch`, `itinerary`, and `pending_dwell` are mutated by
//! both the owning task and the shuttle sweep, so they all live behind the
//! actor's own mutex.  The lock order everywhere is shuttle lock first, actor
//! lock second; the actor lock is never held across a call into the shuttle.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use taxi_core::{ActorId, BranchId};
use taxi_roster::{Itinerary, Leg};

// ── ActorState ────────────────────────────────────────────────────────────────

/// Where an actor is in its hail/ride/dwell cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActorState {
    /// At a branch, not yet hailed (or dwelling after a discharge).
    Waiting,
    /// Signalled intent to board; sitting in the shuttle's hailed queue.
    Hailed,
    /// Aboard, destination not yet confirmed.
    PickedUp,
    /// Aboard with a confirmed destination, shuttle not yet departed.
    Requested,
    /// Aboard and moving; discharged when the shuttle reaches the destination.
    Traveling,
}

// ── ActorCore ─────────────────────────────────────────────────────────────────

/// The shared-mutable half of an actor, guarded by [`Actor`]'s mutex.
#[derive(Debug)]
pub struct ActorCore {
    pub state:          ActorState,
    pub current_branch: BranchId,
    /// Remaining legs, consumed from the front as each completes.
    pub itinerary:      VecDeque<Leg>,
    /// Dwell recorded by the discharge phase, slept out by the owning task.
    pub pending_dwell:  Option<u32>,
}

impl ActorCore {
    /// The leg the actor will request next, if any remain.
    pub fn next_leg(&self) -> Option<Leg> {
        self.itinerary.front().copied()
    }
}

// ── Actor ─────────────────────────────────────────────────────────────────────

/// One person, shared between its task and the shuttle via `Arc<Actor>`.
#[derive(Debug)]
pub struct Actor {
    id:      ActorId,
    core:    Mutex<ActorCore>,
    /// Signalled by the shuttle whenever it changes this actor's state, so
    /// the owning task re-checks promptly instead of sleeping blind.
    changed: Condvar,
}

impl Actor {
    /// Create an actor at the origin branch with its full itinerary.
    pub fn new(id: ActorId, itinerary: Itinerary) -> Self {
        Self {
            id,
            core: Mutex::new(ActorCore {
                state:          ActorState::Waiting,
                current_branch: BranchId::ORIGIN,
                itinerary:      itinerary.into_legs().into(),
                pending_dwell:  None,
            }),
            changed: Condvar::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Acquire the actor's exclusion lock.
    ///
    /// A poisoned lock means a sibling task panicked mid-update; the guard is
    /// recovered so the rest of the simulation can still shut down cleanly.
    pub fn lock(&self) -> MutexGuard<'_, ActorCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state, for inspection.  Takes and releases the lock.
    pub fn state(&self) -> ActorState {
        self.lock().state
    }

    /// Wake the owning task after a state change.
    pub fn notify(&self) {
        self.changed.notify_all();
    }

    /// Block on the state-change condvar until notified or `timeout` elapses.
    ///
    /// Early wakeups are fine: callers re-check state on every return.
    pub fn wait_timeout<'a>(
        &'a self,
        guard:   MutexGuard<'a, ActorCore>,
        timeout: Duration,
    ) -> MutexGuard<'a, ActorCore> {
        self.changed
            .wait_timeout(guard, timeout)
            .unwrap_or_else(PoisonError::into_inner)
            .0
    }

    /// REQUESTED → TRAVELING plus the move-with-shuttle branch update.
    ///
    /// Called by the advance phase for every requested actor when the shuttle
    /// departs.  A no-op for actors in any other state (already traveling,
    /// or discharged in a race).
    pub fn travel_to(&self, branch: BranchId) {
        let mut core = self.lock();
        if core.state == ActorState::Requested {
            core.state = ActorState::Traveling;
            core.current_branch = branch;
            drop(core);
            self.notify();
        }
    }
}
