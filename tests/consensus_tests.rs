//! Integration tests for the MSR consensus family on full networks.

use perco_msr::{trimmed_consensus_update, Algorithm, Network, PercoError, RunTrace};

/// Wire every leader to every follower.
fn full_leader_coverage(num_leaders: usize, num_agents: usize) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for l in 0..num_leaders {
        for f in num_leaders..num_agents {
            edges.push((l, f));
        }
    }
    edges
}

#[test]
fn test_w_msr_converges_to_leader_reference() {
    let mut net = Network::new(3, 9, 1, 0.0, 11).unwrap();
    let edges = full_leader_coverage(3, 9);
    for t in 0..25 {
        net.connect(&edges).unwrap();
        net.run_round(t, &Algorithm::WMsr).unwrap();
    }
    // Each follower sees {0, 0, 0} per round; after trimming one value the
    // error contracts by a factor of three every round.
    let trace = RunTrace::capture(&net);
    assert!(trace.final_follower_error(0.0) < 1e-6);
}

#[test]
fn test_w_msr_converges_over_alternating_topology() {
    // Two graphs alternate: the leaders cover followers 3..=5 on even rounds
    // and 6..=8 on odd rounds. Every follower aggregates on half the rounds
    // and holds its state on the rest.
    let mut net = Network::new(3, 9, 1, 0.0, 19).unwrap();
    let even: Vec<(usize, usize)> = (0..3).flat_map(|l| (3..6).map(move |f| (l, f))).collect();
    let odd: Vec<(usize, usize)> = (0..3).flat_map(|l| (6..9).map(move |f| (l, f))).collect();
    for t in 0..10 {
        let graph = if t % 2 == 0 { &even } else { &odd };
        net.connect(graph).unwrap();
        net.run_round(t, &Algorithm::WMsr).unwrap();
    }
    // Five aggregations per follower, each contracting the error threefold:
    // worst case 1000 / 3^5 ≈ 4.1
    let trace = RunTrace::capture(&net);
    assert!(trace.final_follower_error(0.0) < 5.0);
}

#[test]
fn test_w_msr_tracks_leader_reference_reset() {
    let mut net = Network::new(3, 9, 1, 0.0, 5).unwrap();
    let edges = full_leader_coverage(3, 9);
    for t in 0..50 {
        net.connect(&edges).unwrap();
        net.update_leader_states(500.0, t, 25);
        net.run_round(t, &Algorithm::WMsr).unwrap();
    }
    // The reference jumped to 500 at t = 25; 25 more rounds re-converge.
    let trace = RunTrace::capture(&net);
    assert!(trace.final_follower_error(500.0) < 1e-4);
}

#[test]
fn test_sw_msr_with_window_one_matches_w_msr() {
    let net = Network::new(3, 9, 1, 0.0, 23).unwrap();
    let mut w = net.clone();
    let mut sw = net;
    let edges = full_leader_coverage(3, 9);
    for t in 0..10 {
        w.connect(&edges).unwrap();
        sw.connect(&edges).unwrap();
        w.run_round(t, &Algorithm::WMsr).unwrap();
        sw.run_round(t, &Algorithm::SwMsr { window: 1 }).unwrap();
    }
    for (a, b) in w.agents().iter().zip(sw.agents()) {
        assert_eq!(a.state(), b.state());
    }
}

#[test]
fn test_sw_msr_closed_rounds_accumulate_the_window() {
    // One follower fed by the leaders only on even rounds still aggregates
    // everything: closed rounds keep the inbox for the next window round.
    let mut net = Network::with_follower_states(3, 0.0, &[810.0], 1, 0).unwrap();
    for t in 0..8 {
        net.connect(&[(0, 3), (1, 3), (2, 3)]).unwrap();
        net.run_round(t, &Algorithm::SwMsr { window: 2 }).unwrap();
    }
    // Window rounds at t = 0, 1, 3, 5, 7: five aggregations happened.
    let trace = RunTrace::capture(&net);
    assert_eq!(trace.states().ncols(), 9);
    assert!(trace.final_follower_error(0.0) < 810.0 / 100.0);
}

#[test]
fn test_bp_msr_quarantines_starved_follower() {
    // Followers 3..=5 are leader-covered; follower 6 hears only from the
    // leaderless periphery plus the injected adversary (signal 0 by default),
    // so it never crosses the 2F + 1 threshold and never aggregates.
    let mut net = Network::new(3, 7, 1, 0.0, 31).unwrap();
    let initial = net.agents()[6].state();
    for t in 0..10 {
        net.connect(&[
            (0, 3),
            (1, 3),
            (2, 3),
            (0, 4),
            (1, 4),
            (2, 4),
            (0, 5),
            (1, 5),
            (2, 5),
            (0, 6),
        ])
        .unwrap();
        net.connect_adversaries();
        net.run_round(
            t,
            &Algorithm::BpMsr {
                forced_activation: None,
            },
        )
        .unwrap();
    }
    assert_eq!(net.agents()[6].activation(), 0);
    assert_eq!(net.agents()[6].state(), initial);
    // The covered followers activated and converged toward the reference
    let trace = RunTrace::capture(&net);
    let finals = trace.final_states();
    for i in 3..6 {
        assert!(finals[i].abs() < 1.0, "follower {i} at {}", finals[i]);
    }
    // Adversary-only input never lifts the census above the covered followers
    let census = trace.activation_census();
    for i in 3..6 {
        assert!(census.per_agent()[6] < census.per_agent()[i]);
    }
}

#[test]
fn test_bp_msr_forced_adversary_activation_widens_convergent_set() {
    // Follower 4 has two leader in-neighbors: one signal short of r = 3.
    // Adversaries forced to broadcast 1 supply the missing vote.
    let net = Network::new(3, 5, 1, 0.0, 13).unwrap();
    let mut honest = net.clone();
    let mut forced = net;
    let edges = [(0, 3), (1, 3), (2, 3), (0, 4), (1, 4)];
    for t in 0..5 {
        for (net, input) in [(&mut honest, None), (&mut forced, Some(1))] {
            net.connect(&edges).unwrap();
            net.connect_adversaries();
            net.run_round(
                t,
                &Algorithm::BpMsr {
                    forced_activation: input,
                },
            )
            .unwrap();
        }
    }
    assert_eq!(honest.agents()[4].activation(), 0);
    assert_eq!(forced.agents()[4].activation(), 1);
    let honest_census = RunTrace::capture(&honest).activation_census();
    let forced_census = RunTrace::capture(&forced).activation_census();
    assert!(forced_census.total() > honest_census.total());
}

#[test]
fn test_bp_msr_converged_set_is_adversary_resilient() {
    // Byzantine adversaries are rewired to every follower each round but only
    // ever signal 0, so the leader-covered followers converge exactly as in
    // the adversary-free run.
    let net = Network::new(3, 6, 1, 0.0, 17).unwrap();
    let mut clean = net.clone();
    let mut attacked = net;
    let edges = full_leader_coverage(3, 6);
    for t in 0..15 {
        clean.connect(&edges).unwrap();
        attacked.connect(&edges).unwrap();
        attacked.connect_adversaries();
        let algo = Algorithm::BpMsr {
            forced_activation: None,
        };
        clean.run_round(t, &algo).unwrap();
        attacked.run_round(t, &algo).unwrap();
    }
    for (a, b) in clean.agents().iter().zip(attacked.agents()) {
        assert_eq!(a.state(), b.state());
    }
}

#[test]
fn test_connect_rejects_out_of_range_edges() {
    let mut net = Network::new(3, 9, 1, 0.0, 0).unwrap();
    assert_eq!(
        net.connect(&[(0, 3), (2, 12)]),
        Err(PercoError::UnknownAgentIndex { index: 12, len: 9 })
    );
}

#[test]
fn test_trace_round_count_matches_rounds_run() {
    let mut net = Network::new(3, 9, 1, 0.0, 3).unwrap();
    let edges = full_leader_coverage(3, 9);
    for t in 0..7 {
        net.connect(&edges).unwrap();
        net.run_round(t, &Algorithm::WMsr).unwrap();
    }
    let trace = RunTrace::capture(&net);
    // Initial state plus one entry per round
    assert_eq!(trace.states().dim(), (9, 8));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn hull(values: &[f64], own: f64) -> (f64, f64) {
        let lo = values.iter().copied().fold(own, f64::min);
        let hi = values.iter().copied().fold(own, f64::max);
        (lo, hi)
    }

    proptest! {
        /// With at most one adversarial value and F = 1, the update stays
        /// inside the convex hull of the honest values and the own state.
        #[test]
        fn prop_single_adversary_cannot_escape_honest_hull(
            own in -1000.0f64..1000.0,
            honest in prop::collection::vec(-1000.0f64..1000.0, 1..8),
            adversarial in -1e9f64..1e9,
        ) {
            let mut received = honest.clone();
            received.push(adversarial);
            let result = trimmed_consensus_update(own, &received, 1).unwrap();
            let (lo, hi) = hull(&honest, own);
            prop_assert!(result >= lo - 1e-9 && result <= hi + 1e-9);
        }

        /// Consensus is a fixed point: once everyone agrees, the update
        /// changes nothing for any trim parameter.
        #[test]
        fn prop_agreement_is_fixed_point(
            value in -1000.0f64..1000.0,
            n in 0usize..10,
            f in 0usize..4,
        ) {
            let received = vec![value; n];
            let result = trimmed_consensus_update(value, &received, f).unwrap();
            prop_assert!((result - value).abs() <= 1e-9 * value.abs().max(1.0));
        }

        /// The update never leaves the hull of everything it saw.
        #[test]
        fn prop_result_within_received_hull(
            own in -1000.0f64..1000.0,
            received in prop::collection::vec(-1000.0f64..1000.0, 0..12),
            f in 0usize..3,
        ) {
            let result = trimmed_consensus_update(own, &received, f).unwrap();
            let (lo, hi) = hull(&received, own);
            prop_assert!(result >= lo - 1e-9 && result <= hi + 1e-9);
        }
    }
}
