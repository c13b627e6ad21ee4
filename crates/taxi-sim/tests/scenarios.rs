//! End-to-end scenarios: full simulations with one thread per actor plus the
//! shuttle thread, all sleeps disabled, events captured in a `TraceLog`.

use std::sync::mpsc;

use taxi_core::{ActorId, BranchId, SimConfig, TimingConfig};
use taxi_roster::{Itinerary, Leg, Roster, RosterEntry};
use taxi_sim::{ChannelSink, MemorySink, SimulationBuilder, TraceEvent, TraceKind, TraceLog};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn instant_config(branch_count: u16) -> SimConfig {
    SimConfig {
        branch_count,
        seed: 42,
        timing: TimingConfig::instant(),
    }
}

fn roster(branch_count: u16, people: &[(u32, &[(u16, u32)])]) -> Roster {
    let entries = people
        .iter()
        .map(|&(id, legs)| {
            let itinerary: Itinerary = legs
                .iter()
                .map(|&(b, d)| Leg::new(BranchId(b), d))
                .collect();
            RosterEntry::new(ActorId(id), itinerary)
        })
        .collect();
    Roster::new(branch_count, entries).unwrap()
}

/// Run a simulation to completion and return the recorded trace.
fn run(branch_count: u16, people: &[(u32, &[(u16, u32)])]) -> Vec<TraceEvent> {
    let log = TraceLog::new();
    let sim = SimulationBuilder::new(instant_config(branch_count), roster(branch_count, people))
        .sink(Box::new(MemorySink::new(log.clone())))
        .start()
        .unwrap();
    sim.join().unwrap();
    log.events()
}

fn events_for(events: &[TraceEvent], actor: ActorId) -> Vec<&TraceEvent> {
    events.iter().filter(|e| e.kind.actor() == Some(actor)).collect()
}

// ── Scenario A: one actor, one leg ────────────────────────────────────────────

#[test]
fn single_actor_single_leg_full_trace() {
    let events = run(3, &[(0, &[(2, 10)])]);

    let expected: Vec<(TraceKind, BranchId)> = vec![
        (TraceKind::Hail { actor: ActorId(0) }, BranchId(0)),
        (TraceKind::PickUp { actor: ActorId(0) }, BranchId(0)),
        (TraceKind::Request { actor: ActorId(0), destination: BranchId(2) }, BranchId(0)),
        (TraceKind::Depart, BranchId(0)),
        (TraceKind::Arrive, BranchId(1)),
        (TraceKind::Depart, BranchId(1)),
        (TraceKind::Arrive, BranchId(2)),
        (TraceKind::Disembark { actor: ActorId(0) }, BranchId(2)),
    ];
    let got: Vec<(TraceKind, BranchId)> = events.iter().map(|e| (e.kind, e.branch)).collect();
    assert_eq!(got, expected);
}

// ── Per-actor ordering and destination properties ─────────────────────────────

#[test]
fn every_actor_follows_the_lifecycle_order() {
    let events = run(4, &[
        (0, &[(2, 5), (1, 5)]),
        (1, &[(1, 5)]),
        (2, &[(3, 5), (0, 5)]),
    ]);

    for (id, legs) in [(0u32, 2usize), (1, 1), (2, 2)] {
        let actor = ActorId(id);
        let mine = events_for(&events, actor);

        // One HAIL → PICKUP → REQUEST → DISEMBARK cycle per itinerary leg.
        assert_eq!(mine.len(), legs * 4, "actor {id}");
        for cycle in mine.chunks(4) {
            assert!(matches!(cycle[0].kind, TraceKind::Hail { .. }), "actor {id}");
            assert!(matches!(cycle[1].kind, TraceKind::PickUp { .. }), "actor {id}");
            assert!(matches!(cycle[2].kind, TraceKind::Request { .. }), "actor {id}");
            assert!(matches!(cycle[3].kind, TraceKind::Disembark { .. }), "actor {id}");

            // Hail and pick-up happen at the same branch; the disembark
            // lands exactly on the requested destination.
            assert_eq!(cycle[0].branch, cycle[1].branch, "actor {id}");
            let TraceKind::Request { destination, .. } = cycle[2].kind else {
                unreachable!()
            };
            assert_eq!(cycle[3].branch, destination, "actor {id}");
        }
    }
}

#[test]
fn disembark_branches_match_the_itinerary() {
    let legs: &[(u16, u32)] = &[(3, 1), (0, 1), (2, 1)];
    let events = run(4, &[(7, legs)]);

    let disembarks: Vec<BranchId> = events
        .iter()
        .filter(|e| matches!(e.kind, TraceKind::Disembark { .. }))
        .map(|e| e.branch)
        .collect();
    let wanted: Vec<BranchId> = legs.iter().map(|&(b, _)| BranchId(b)).collect();
    assert_eq!(disembarks, wanted);
}

// ── Triangle traversal ────────────────────────────────────────────────────────

#[test]
fn shuttle_moves_in_a_triangle_wave() {
    // An itinerary that forces several full sweeps of a 4-branch line.
    let events = run(4, &[(0, &[(3, 1), (0, 1), (3, 1)])]);

    let mut hops: Vec<(u16, u16)> = Vec::new();
    let mut pending_depart: Option<u16> = None;
    for e in &events {
        match e.kind {
            TraceKind::Depart => pending_depart = Some(e.branch.0),
            TraceKind::Arrive => {
                let from = pending_depart.take().expect("arrive without depart");
                hops.push((from, e.branch.0));
            }
            _ => {}
        }
    }
    assert!(!hops.is_empty());

    let last = 3u16;
    for (i, &(from, to)) in hops.iter().enumerate() {
        // Every hop moves exactly one branch.
        assert_eq!(from.abs_diff(to), 1, "hop {i}: {from} → {to}");
        // Endpoints reverse, interior stops keep direction.
        if from == 0 {
            assert_eq!(to, 1, "hop {i}");
        } else if from == last {
            assert_eq!(to, last - 1, "hop {i}");
        }
        // Consecutive hops chain: next departure is from this arrival.
        if let Some(&(next_from, _)) = hops.get(i + 1) {
            assert_eq!(to, next_from, "hop {i} does not chain");
        }
    }

    // Direction only flips at the ends of the line.
    for window in hops.windows(2) {
        let (a_from, a_to) = window[0];
        let (b_from, b_to) = window[1];
        let a_outbound = a_to > a_from;
        let b_outbound = b_to > b_from;
        if a_outbound != b_outbound {
            assert!(
                a_to == 0 || a_to == last,
                "direction flipped mid-line at branch {a_to} ({a_from}→{a_to}, {b_from}→{b_to})"
            );
        }
    }
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

#[test]
fn simulation_shuts_down_when_the_roster_drains() {
    let log = TraceLog::new();
    let sim = SimulationBuilder::new(
        instant_config(3),
        roster(3, &[(0, &[(2, 1)]), (1, &[(1, 1), (2, 1)])]),
    )
    .sink(Box::new(MemorySink::new(log.clone())))
    .start()
    .unwrap();

    let shuttle = std::sync::Arc::clone(sim.shuttle());
    sim.join().unwrap();

    assert_eq!(shuttle.live_actors(), 0);
    let snap = shuttle.snapshot();
    assert!(snap.hailed.is_empty());
    assert!(snap.picked_up.is_empty());
    assert!(snap.requested.is_empty());
}

#[test]
fn empty_roster_finishes_immediately() {
    let log = TraceLog::new();
    let sim = SimulationBuilder::new(instant_config(3), roster(3, &[]))
        .sink(Box::new(MemorySink::new(log.clone())))
        .start()
        .unwrap();
    sim.join().unwrap();
    assert!(log.is_empty());
}

// ── Config / roster mismatch ──────────────────────────────────────────────────

#[test]
fn branch_count_mismatch_is_rejected() {
    let result = SimulationBuilder::new(instant_config(4), roster(3, &[(0, &[(2, 1)])])).start();
    assert!(result.is_err());
}

// ── Channel sink ──────────────────────────────────────────────────────────────

#[test]
fn channel_sink_streams_events_in_order() {
    let (tx, rx) = mpsc::channel();
    let sim = SimulationBuilder::new(instant_config(3), roster(3, &[(0, &[(2, 1)])]))
        .sink(Box::new(ChannelSink(tx)))
        .start()
        .unwrap();
    sim.join().unwrap();

    let events: Vec<TraceEvent> = rx.iter().collect();
    assert_eq!(events.len(), 8);
    assert!(matches!(events[0].kind, TraceKind::Hail { actor } if actor == ActorId(0)));
    assert!(matches!(events[7].kind, TraceKind::Disembark { .. }));
}

// ── A heavier soak: several actors, several legs, invariants hold ────────────

#[test]
fn multi_actor_soak_preserves_invariants() {
    let events = run(5, &[
        (0, &[(4, 1), (2, 1)]),
        (1, &[(1, 1), (3, 1), (0, 1)]),
        (2, &[(2, 1)]),
        (3, &[(3, 1), (1, 1)]),
    ]);

    // Every leg of every actor completed.
    let total_legs = 2 + 3 + 1 + 2;
    let disembarks = events
        .iter()
        .filter(|e| matches!(e.kind, TraceKind::Disembark { .. }))
        .count();
    assert_eq!(disembarks, total_legs);

    // Per-actor event order never regresses.
    for id in 0..4u32 {
        let mine = events_for(&events, ActorId(id));
        let mut expected = [
            "hail", "pickup", "request", "disembark",
        ]
        .iter()
        .cycle();
        for e in mine {
            let got = match e.kind {
                TraceKind::Hail { .. } => "hail",
                TraceKind::PickUp { .. } => "pickup",
                TraceKind::Request { .. } => "request",
                TraceKind::Disembark { .. } => "disembark",
                _ => unreachable!(),
            };
            assert_eq!(&got, expected.next().unwrap(), "actor {id}");
        }
    }
}
