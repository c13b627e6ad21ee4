//! Boots the shuttle and the population, owns their join handles.
//!
//! There is no ambient global state: the coordinator constructs one
//! [`Shuttle`], wraps every roster entry in an [`Actor`], and hands explicit
//! `Arc`s to each spawned thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use taxi_core::{ActorId, ActorRng, SimConfig};
use taxi_roster::Roster;

use crate::actor::Actor;
use crate::shuttle::Shuttle;
use crate::task::run_actor;
use crate::trace::{ConsoleSink, TraceSink, Tracer};
use crate::{SimError, SimResult};

// ── SimulationBuilder ─────────────────────────────────────────────────────────

/// Validating builder for a [`Simulation`].
///
/// The trace sink defaults to [`ConsoleSink`]; hosts redirect the stream by
/// supplying their own.
pub struct SimulationBuilder {
    config: SimConfig,
    roster: Roster,
    sink:   Option<Box<dyn TraceSink>>,
}

impl SimulationBuilder {
    pub fn new(config: SimConfig, roster: Roster) -> Self {
        Self { config, roster, sink: None }
    }

    /// Redirect trace events to `sink` instead of the console.
    pub fn sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate, construct the shuttle, and spawn every task.
    pub fn start(self) -> SimResult<Simulation> {
        self.config.validate()?;
        if self.roster.branch_count() != self.config.branch_count {
            return Err(SimError::BranchCountMismatch {
                roster: self.roster.branch_count(),
                config: self.config.branch_count,
            });
        }

        let timing = self.config.timing.clone();
        let sink = self.sink.unwrap_or_else(|| Box::new(ConsoleSink));
        let tracer = Tracer::new(&timing, sink);

        let shuttle = Arc::new(Shuttle::new(
            self.config.branch_count,
            timing.clone(),
            tracer,
            self.roster.len(),
        ));

        info!(
            branches = self.config.branch_count,
            population = self.roster.len(),
            "starting simulation"
        );

        let shuttle_handle = {
            let shuttle = Arc::clone(&shuttle);
            thread::Builder::new()
                .name("shuttle".into())
                .spawn(move || shuttle.run())?
        };

        let mut actor_handles = Vec::with_capacity(self.roster.len());
        for entry in self.roster.into_entries() {
            let id = entry.actor;
            let actor = Arc::new(Actor::new(id, entry.itinerary));
            let rng = ActorRng::new(self.config.seed, id);
            let shuttle = Arc::clone(&shuttle);
            let timing = timing.clone();
            let handle = thread::Builder::new()
                .name(format!("actor-{}", id.0))
                .spawn(move || run_actor(shuttle, actor, rng, timing))?;
            debug!(actor = %id, "actor task spawned");
            actor_handles.push((id, handle));
        }

        Ok(Simulation { shuttle, shuttle_handle, actor_handles })
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// A running simulation: the shared shuttle plus every task's join handle.
pub struct Simulation {
    shuttle:        Arc<Shuttle>,
    shuttle_handle: JoinHandle<SimResult<()>>,
    actor_handles:  Vec<(ActorId, JoinHandle<SimResult<()>>)>,
}

impl Simulation {
    /// The shared shuttle, e.g. for [`Shuttle::snapshot`] liveness polling.
    pub fn shuttle(&self) -> &Arc<Shuttle> {
        &self.shuttle
    }

    /// Wait for every actor task and then the shuttle to finish.
    ///
    /// The shuttle exits once the population drains, so this returns for any
    /// well-formed roster.  The first task error (or panic) is propagated.
    pub fn join(self) -> SimResult<()> {
        let mut first_err: Option<SimError> = None;

        for (id, handle) in self.actor_handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    first_err.get_or_insert(err);
                }
                Err(_) => {
                    first_err.get_or_insert(SimError::TaskPanicked {
                        name: format!("actor-{}", id.0),
                    });
                }
            }
        }

        match self.shuttle_handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                first_err.get_or_insert(err);
            }
            Err(_) => {
                first_err.get_or_insert(SimError::TaskPanicked { name: "shuttle".into() });
            }
        }

        match first_err {
            None => {
                info!("simulation complete");
                Ok(())
            }
            Some(err) => Err(err),
        }
    }
}
