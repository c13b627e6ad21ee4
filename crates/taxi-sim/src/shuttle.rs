//! The shuttle: three shared queues and the pick-up / discharge / advance
//! sweep that services them.
//!
//! # Queue discipline
//!
//! | Collection  | Membership means                    | Actor state        |
//! |-------------|-------------------------------------|--------------------|
//! | `hailed`    | wants to board, not yet aboard      | `Hailed`           |
//! | `picked_up` | aboard                              | `PickedUp`/`Requested`/`Traveling` |
//! | `requested` | destination confirmed, not arrived  | `Requested`/`Traveling` |
//!
//! `requested` is a sub-index of `picked_up` (the discharge phase requires
//! membership in both); `hailed` and `picked_up` are mutually exclusive.
//! `hailed` is a FIFO queue on purpose: iteration order is service order,
//! so actors hailing at the same branch board first-come-first-served.
//!
//! # Locking
//!
//! One shuttle-wide mutex serializes `hail`, `request_destination`, and each
//! sweep phase against one another; they are read-modify-write operations
//! over the same collections and must not interleave.  Per-actor fields are
//! guarded by each actor's own lock, always acquired *after* the shuttle
//! lock.  The simulated dwell and travel sleeps happen inside the phases —
//! producers may block briefly on the shuttle lock during a traversal, which
//! is the simulated time passing, not I/O.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use tracing::debug;

use taxi_core::{ActorId, BranchId, TimingConfig};
use taxi_roster::Leg;

use crate::actor::{Actor, ActorState};
use crate::trace::{TraceKind, Tracer};
use crate::{SimError, SimResult};

// ── Direction / phase ─────────────────────────────────────────────────────────

/// Travel direction along the line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Branch index increasing, toward the last branch.
    Outbound,
    /// Branch index decreasing, toward the origin.
    Inbound,
}

/// Lifecycle phase gating which sweep actions may proceed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShuttlePhase {
    /// At a stop; pick-ups and discharges may run.
    Waiting,
    /// Discharge done; eligible to depart on pending requests.
    Ready,
    /// Between branches.
    Running,
}

/// One triangle-traversal step: advance `branch` one place in `direction`,
/// reversing at the ends of the line.
pub(crate) fn step(direction: Direction, branch: u16, last: u16) -> (u16, Direction) {
    match direction {
        Direction::Outbound if branch < last => (branch + 1, Direction::Outbound),
        Direction::Outbound => (branch - 1, Direction::Inbound),
        Direction::Inbound if branch > 0 => (branch - 1, Direction::Inbound),
        Direction::Inbound => (branch + 1, Direction::Outbound),
    }
}

// ── Shared state ──────────────────────────────────────────────────────────────

/// A requested-map entry: the rider plus the leg it confirmed.
struct RequestedEntry {
    actor: Arc<Actor>,
    leg:   Leg,
}

/// Everything behind the shuttle-wide lock.
struct ShuttleInner {
    phase:              ShuttlePhase,
    direction:          Direction,
    current_branch:     BranchId,
    previous_branch:    BranchId,
    hailed:             VecDeque<Arc<Actor>>,
    picked_up:          VecDeque<Arc<Actor>>,
    requested:          FxHashMap<ActorId, RequestedEntry>,
    /// Destination requests confirmed at the current stop.
    requests_this_stop: u32,
    /// Actors boarded at the current stop.
    picked_this_stop:   u32,
}

impl ShuttleInner {
    fn is_idle(&self) -> bool {
        self.hailed.is_empty() && self.picked_up.is_empty() && self.requested.is_empty()
    }

    /// Which queue holds `actor`, if any.  Used for conflict detection.
    fn queue_of(&self, actor: ActorId) -> Option<&'static str> {
        if self.hailed.iter().any(|a| a.id() == actor) {
            Some("hailed")
        } else if self.picked_up.iter().any(|a| a.id() == actor) {
            Some("picked-up")
        } else if self.requested.contains_key(&actor) {
            Some("requested")
        } else {
            None
        }
    }
}

/// A consistent read of the shuttle's observable state.
///
/// This is the liveness surface: a host that suspects a stalled actor can
/// poll it and see exactly which queue the actor is parked in.
#[derive(Clone, Debug)]
pub struct ShuttleSnapshot {
    pub current_branch:     BranchId,
    pub previous_branch:    BranchId,
    pub direction:          Direction,
    pub phase:              ShuttlePhase,
    pub hailed:             Vec<ActorId>,
    pub picked_up:          Vec<ActorId>,
    pub requested:          Vec<ActorId>,
    pub requests_this_stop: u32,
    pub picked_this_stop:   u32,
}

// ── Shuttle ───────────────────────────────────────────────────────────────────

/// The single shuttle.  Shared as `Arc<Shuttle>` between its own sweep
/// thread and every actor task.
pub struct Shuttle {
    branch_count: u16,
    timing:       TimingConfig,
    tracer:       Tracer,
    inner:        Mutex<ShuttleInner>,
    /// Signalled on every hail, request, and actor-task exit so the sweep
    /// loop can idle on a condvar instead of polling empty queues.
    wake:         Condvar,
    /// Actor tasks still running.  When it reaches zero and the queues are
    /// empty the sweep loop exits.
    live_actors:  AtomicUsize,
}

impl Shuttle {
    /// Create a shuttle at the origin, outbound, expecting `population`
    /// actor tasks.
    pub fn new(branch_count: u16, timing: TimingConfig, tracer: Tracer, population: usize) -> Self {
        debug_assert!(branch_count >= 2, "a line needs at least 2 branches");
        Self {
            branch_count,
            timing,
            tracer,
            inner: Mutex::new(ShuttleInner {
                phase:              ShuttlePhase::Waiting,
                direction:          Direction::Outbound,
                current_branch:     BranchId::ORIGIN,
                previous_branch:    BranchId::ORIGIN,
                hailed:             VecDeque::new(),
                picked_up:          VecDeque::new(),
                requested:          FxHashMap::default(),
                requests_this_stop: 0,
                picked_this_stop:   0,
            }),
            wake: Condvar::new(),
            live_actors: AtomicUsize::new(population),
        }
    }

    #[inline]
    pub fn branch_count(&self) -> u16 {
        self.branch_count
    }

    fn lock_inner(&self) -> MutexGuard<'_, ShuttleInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Producer entry points (called by actor tasks) ─────────────────────

    /// Signal intent to board at the actor's current branch.
    ///
    /// A no-op unless the actor is `Waiting` (the idempotent-filtering
    /// policy).  Finding a `Waiting` actor already inside a queue is a
    /// locking-discipline breach and aborts the caller.
    pub fn hail(&self, actor: &Arc<Actor>) -> SimResult<()> {
        let mut inner = self.lock_inner();

        let branch = {
            let mut core = actor.lock();
            if core.state != ActorState::Waiting {
                return Ok(());
            }
            if let Some(queue) = inner.queue_of(actor.id()) {
                return Err(SimError::QueueConflict { actor: actor.id(), queue });
            }
            core.state = ActorState::Hailed;
            core.current_branch
        };

        inner.hailed.push_back(Arc::clone(actor));
        self.tracer.emit(branch, TraceKind::Hail { actor: actor.id() });
        self.wake.notify_all();
        Ok(())
    }

    /// Confirm the actor's next destination.
    ///
    /// A no-op unless the actor is aboard (`picked_up` membership) and still
    /// `PickedUp` — which also makes a duplicate request a no-op, since the
    /// first one moved the actor to `Requested`.
    pub fn request_destination(&self, actor: &Arc<Actor>) -> SimResult<()> {
        let mut inner = self.lock_inner();

        if !inner.picked_up.iter().any(|a| a.id() == actor.id()) {
            return Ok(());
        }

        let (branch, leg) = {
            let mut core = actor.lock();
            if core.state != ActorState::PickedUp {
                return Ok(());
            }
            if inner.requested.contains_key(&actor.id()) {
                return Err(SimError::QueueConflict { actor: actor.id(), queue: "requested" });
            }
            let leg = core
                .next_leg()
                .ok_or(SimError::ItineraryExhausted { actor: actor.id() })?;
            core.state = ActorState::Requested;
            (core.current_branch, leg)
        };

        inner.requested.insert(
            actor.id(),
            RequestedEntry { actor: Arc::clone(actor), leg },
        );
        inner.requests_this_stop += 1;
        self.tracer.emit(
            branch,
            TraceKind::Request { actor: actor.id(), destination: leg.destination },
        );
        self.wake.notify_all();
        Ok(())
    }

    /// Called by each actor task as it exits, so the sweep loop can observe
    /// the population draining.
    pub fn actor_finished(&self) {
        self.live_actors.fetch_sub(1, Ordering::AcqRel);
        let _guard = self.lock_inner();
        self.wake.notify_all();
    }

    /// Actor tasks still running.
    pub fn live_actors(&self) -> usize {
        self.live_actors.load(Ordering::Acquire)
    }

    // ── Sweep phases ──────────────────────────────────────────────────────
    //
    // Public so tests (and embedders that want a synchronous shuttle) can
    // drive one phase at a time; `run` executes them in the strict
    // pick-up → discharge → advance order.

    /// Phase 1: board every hailed actor standing at the current branch.
    pub fn pick_up(&self) {
        std::thread::sleep(self.timing.real(self.timing.pickup_dwell_minutes));

        let mut inner = self.lock_inner();
        if inner.phase != ShuttlePhase::Waiting {
            return;
        }
        let current = inner.current_branch;

        let mut i = 0;
        while i < inner.hailed.len() {
            let actor = Arc::clone(&inner.hailed[i]);
            let boarding = {
                let mut core = actor.lock();
                if core.state == ActorState::Hailed && core.current_branch == current {
                    core.state = ActorState::PickedUp;
                    true
                } else {
                    false
                }
            };

            if boarding {
                inner.hailed.remove(i);
                inner.picked_up.push_back(Arc::clone(&actor));
                inner.picked_this_stop += 1;
                self.tracer.emit(current, TraceKind::PickUp { actor: actor.id() });
                actor.notify();
            } else {
                i += 1;
            }
        }
    }

    /// Phase 2: let riders off whose destination is the current branch.
    ///
    /// Runs only if there are pending requests, the shuttle actually changed
    /// branch since the last discharge, and the phase is `Waiting`.  Each
    /// discharged actor's itinerary head is consumed and its dwell recorded
    /// for the owning task to sleep out.  The phase always ends `Ready`.
    pub fn discharge(&self) {
        let mut inner = self.lock_inner();

        if !inner.requested.is_empty()
            && inner.previous_branch != inner.current_branch
            && inner.phase == ShuttlePhase::Waiting
        {
            let current = inner.current_branch;

            let mut i = 0;
            while i < inner.picked_up.len() {
                let actor = Arc::clone(&inner.picked_up[i]);
                let leg = match inner.requested.get(&actor.id()) {
                    Some(entry) if entry.leg.destination == current => entry.leg,
                    _ => {
                        i += 1;
                        continue;
                    }
                };

                let discharging = {
                    let mut core = actor.lock();
                    if core.state == ActorState::Traveling {
                        core.itinerary.pop_front();
                        core.state = ActorState::Waiting;
                        core.current_branch = current;
                        core.pending_dwell = Some(leg.dwell_minutes);
                        true
                    } else {
                        false
                    }
                };

                if discharging {
                    inner.picked_up.remove(i);
                    inner.requested.remove(&actor.id());
                    self.tracer.emit(current, TraceKind::Disembark { actor: actor.id() });
                    actor.notify();
                } else {
                    i += 1;
                }
            }
        }

        inner.phase = ShuttlePhase::Ready;
    }

    /// Phase 3: depart for the next branch if the stop's work is done.
    ///
    /// Eligible only when every pick-up at this stop has confirmed a
    /// destination (`requests == picked`) and there is somewhere to go:
    /// someone hailing elsewhere, or riders with pending destinations.
    /// Departing flips `Requested` riders to `Traveling`, steps the branch
    /// one place in the triangle traversal, and resets the per-stop
    /// counters.  Ineligible calls just settle the phase back to `Waiting`.
    pub fn advance(&self) {
        let mut inner = self.lock_inner();

        let eligible = inner.requests_this_stop == inner.picked_this_stop
            && (!inner.hailed.is_empty()
                || (!inner.requested.is_empty() && inner.phase == ShuttlePhase::Ready));

        if !eligible {
            inner.phase = ShuttlePhase::Waiting;
            return;
        }

        // The travel sleep happens under the lock: the phases of one sweep
        // must not interleave with producers mid-traversal.
        std::thread::sleep(self.timing.real(self.timing.travel_minutes));

        self.tracer.emit(inner.current_branch, TraceKind::Depart);
        inner.phase = ShuttlePhase::Running;
        inner.previous_branch = inner.current_branch;

        let (next, direction) = step(
            inner.direction,
            inner.current_branch.0,
            self.branch_count - 1,
        );
        inner.current_branch = BranchId(next);
        inner.direction = direction;

        for entry in inner.requested.values() {
            entry.actor.travel_to(inner.current_branch);
        }

        self.tracer.emit(inner.current_branch, TraceKind::Arrive);
        inner.requests_this_stop = 0;
        inner.picked_this_stop = 0;
        inner.phase = ShuttlePhase::Waiting;
    }

    // ── Sweep loop ────────────────────────────────────────────────────────

    /// The perpetual sweep: pick up, discharge, advance, pause; idle on the
    /// wake condvar while all queues are empty; exit once the population has
    /// drained.
    pub fn run(&self) -> SimResult<()> {
        debug!(branches = self.branch_count, "shuttle sweep starting");
        loop {
            {
                let mut inner = self.lock_inner();
                while inner.is_idle() {
                    if self.live_actors() == 0 {
                        debug!("population drained; shuttle retiring");
                        return Ok(());
                    }
                    inner = self
                        .wake
                        .wait(inner)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }

            self.pick_up();
            self.discharge();
            self.advance();

            std::thread::sleep(self.timing.real(self.timing.cycle_pause_minutes));
        }
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// A consistent snapshot of branch, direction, phase, counters, and the
    /// three membership lists.
    pub fn snapshot(&self) -> ShuttleSnapshot {
        let inner = self.lock_inner();
        let mut requested: Vec<ActorId> = inner.requested.keys().copied().collect();
        requested.sort_unstable();
        ShuttleSnapshot {
            current_branch:     inner.current_branch,
            previous_branch:    inner.previous_branch,
            direction:          inner.direction,
            phase:              inner.phase,
            hailed:             inner.hailed.iter().map(|a| a.id()).collect(),
            picked_up:          inner.picked_up.iter().map(|a| a.id()).collect(),
            requested,
            requests_this_stop: inner.requests_this_stop,
            picked_this_stop:   inner.picked_this_stop,
        }
    }
}
