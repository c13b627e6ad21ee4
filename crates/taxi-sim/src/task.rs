//! The per-actor thread loop.
//!
//! Each actor alternates between hailing the shuttle and, once aboard,
//! requesting its next destination; between attempts it blocks on its own
//! state-change condvar with a small randomized timeout, so it reacts
//! promptly to shuttle notifications without the population hammering the
//! shuttle lock in lockstep.  After a discharge it sleeps out the dwell the
//! shuttle recorded, then starts the next leg.  The task ends when the
//! itinerary empties.

use std::sync::Arc;
use std::thread;

use tracing::debug;

use taxi_core::{ActorRng, TimingConfig};

use crate::actor::{Actor, ActorState};
use crate::shuttle::Shuttle;
use crate::SimResult;

/// Run one actor to itinerary exhaustion.
///
/// Always reports task exit to the shuttle, even on error, so the sweep loop
/// can observe the population draining and shut down.
pub fn run_actor(
    shuttle: Arc<Shuttle>,
    actor:   Arc<Actor>,
    rng:     ActorRng,
    timing:  TimingConfig,
) -> SimResult<()> {
    let result = actor_loop(&shuttle, &actor, rng, &timing);
    if let Err(err) = &result {
        debug!(actor = %actor.id(), %err, "actor task aborting");
    }
    shuttle.actor_finished();
    result
}

fn actor_loop(
    shuttle: &Shuttle,
    actor:   &Arc<Actor>,
    mut rng: ActorRng,
    timing:  &TimingConfig,
) -> SimResult<()> {
    // Stagger the first hail so the population doesn't arrive in lockstep.
    thread::sleep(timing.real(rng.jitter_minutes(timing.poll_jitter_minutes)));

    loop {
        let (state, dwell, exhausted) = {
            let mut core = actor.lock();
            (core.state, core.pending_dwell.take(), core.itinerary.is_empty())
        };

        // Dwell from the last discharge is slept here, by the owner, not by
        // the shuttle thread.
        if let Some(minutes) = dwell {
            thread::sleep(timing.real(minutes));
        }

        if exhausted && state == ActorState::Waiting {
            debug!(actor = %actor.id(), "itinerary complete");
            return Ok(());
        }

        match state {
            ActorState::Waiting => shuttle.hail(actor)?,
            ActorState::PickedUp => shuttle.request_destination(actor)?,
            // Hailed / Requested / Traveling: nothing to do until the sweep
            // moves us along.
            _ => {}
        }

        // Block until the shuttle changes our state or the jitter elapses;
        // early wakeups just re-check.
        let jitter = rng.jitter_minutes(timing.poll_jitter_minutes);
        let guard = actor.lock();
        drop(actor.wait_timeout(guard, timing.real(jitter)));
    }
}
