//! The trace pipeline: the simulation's sole observable output.
//!
//! Every state change the outside world may care about — hail, request,
//! pick-up, disembark, depart, arrive — is emitted as one [`TraceEvent`]
//! through a pluggable [`TraceSink`].  The [`Tracer`] stamps each event with
//! the simulated clock, which advances by a fixed increment *per event*, so
//! the timeline is deterministic and auditable regardless of real scheduling.

use std::fmt;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

use taxi_core::{ActorId, BranchId, Clock, TimingConfig};

// ── TraceEvent ────────────────────────────────────────────────────────────────

/// What happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceKind {
    Hail { actor: ActorId },
    Request { actor: ActorId, destination: BranchId },
    Depart,
    Arrive,
    PickUp { actor: ActorId },
    Disembark { actor: ActorId },
}

impl TraceKind {
    /// The actor involved, if the event concerns one.
    pub fn actor(&self) -> Option<ActorId> {
        match *self {
            TraceKind::Hail { actor }
            | TraceKind::Request { actor, .. }
            | TraceKind::PickUp { actor }
            | TraceKind::Disembark { actor } => Some(actor),
            TraceKind::Depart | TraceKind::Arrive => None,
        }
    }
}

/// One timestamped, externally observable record of a state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceEvent {
    /// Simulated `h:m` clock label at emission.
    pub label:  String,
    /// Branch the event happened at (the actor's branch for hail/request,
    /// the shuttle's for everything else).
    pub branch: BranchId,
    pub kind:   TraceKind,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} branch {} : ", self.label, self.branch.0)?;
        match self.kind {
            TraceKind::Hail { actor } => write!(f, "person {} hail", actor.0),
            TraceKind::Request { actor, destination } => {
                write!(f, "person {} request {}", actor.0, destination.0)
            }
            TraceKind::Depart => write!(f, "taxi depart"),
            TraceKind::Arrive => write!(f, "taxi arrive"),
            TraceKind::PickUp { actor } => write!(f, "pick up person {}", actor.0),
            TraceKind::Disembark { actor } => write!(f, "disembark person {}", actor.0),
        }
    }
}

// ── TraceSink ─────────────────────────────────────────────────────────────────

/// Where trace events go.  The host may redirect the stream anywhere —
/// console, a channel, a test buffer, a file writer.
pub trait TraceSink: Send {
    fn emit(&mut self, event: &TraceEvent);
}

/// Prints each event as one console line.
pub struct ConsoleSink;

impl TraceSink for ConsoleSink {
    fn emit(&mut self, event: &TraceEvent) {
        println!("{event}");
    }
}

/// Forwards each event over a std `mpsc` channel.
///
/// Sending to a disconnected receiver drops the event silently; a departed
/// consumer must not take the simulation down with it.
pub struct ChannelSink(pub mpsc::Sender<TraceEvent>);

impl TraceSink for ChannelSink {
    fn emit(&mut self, event: &TraceEvent) {
        let _ = self.0.send(event.clone());
    }
}

/// A shared, appendable event log for tests and embedders.
///
/// Clone the log, hand a [`MemorySink`] over it to the simulation, and read
/// the events back after `join()`.
#[derive(Clone, Default)]
pub struct TraceLog(Arc<Mutex<Vec<TraceEvent>>>);

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events recorded so far, in emission order.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn push(&self, event: TraceEvent) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Records every event into a [`TraceLog`].
pub struct MemorySink(TraceLog);

impl MemorySink {
    pub fn new(log: TraceLog) -> Self {
        Self(log)
    }
}

impl TraceSink for MemorySink {
    fn emit(&mut self, event: &TraceEvent) {
        self.0.push(event.clone());
    }
}

// ── Tracer ────────────────────────────────────────────────────────────────────

/// Serializes event emission and owns the simulated clock.
///
/// The clock is mutated *only* here, under the tracer's own lock, which is a
/// leaf lock: nothing is acquired while it is held.  Callers already hold
/// the shuttle lock when emitting, so trace order matches operation order.
pub struct Tracer {
    inner: Mutex<TracerInner>,
}

struct TracerInner {
    clock:              Clock,
    minutes_per_event:  u32,
    sink:               Box<dyn TraceSink>,
}

impl Tracer {
    pub fn new(timing: &TimingConfig, sink: Box<dyn TraceSink>) -> Self {
        Self {
            inner: Mutex::new(TracerInner {
                clock:             timing.make_clock(),
                minutes_per_event: timing.clock_minutes_per_event,
                sink,
            }),
        }
    }

    /// Advance the clock one increment, stamp, and emit.
    pub fn emit(&self, branch: BranchId, kind: TraceKind) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let step = inner.minutes_per_event;
        inner.clock.advance(step);
        let event = TraceEvent {
            label: inner.clock.label(),
            branch,
            kind,
        };
        inner.sink.emit(&event);
    }
}
