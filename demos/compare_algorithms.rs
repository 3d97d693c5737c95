//! Compare W-MSR, SW-MSR, and BP-MSR on the reference 9-agent experiment
//!
//! Three identically-initialized networks run a hundred rounds over the
//! periodic graph sequence (G1, G2, G1, ...); the SW-MSR network switches to
//! the union of G1 and G2 after the first window. One Byzantine adversary is
//! injected and rewired to every follower each round, and the leader
//! reference jumps to a fresh random value halfway through.
//!
//! Pass a file path as the first argument to dump the three run traces as
//! JSON.

use ndarray::Array1;
use perco_msr::{Algorithm, Network, RunTrace, SimConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::BufWriter;

const GCAL_1: &[(usize, usize)] = &[
    (4, 5),
    (0, 6),
    (1, 6),
    (2, 6),
    (8, 6),
    (3, 7),
    (0, 3),
    (4, 7),
    (8, 7),
    (2, 5),
    (0, 5),
    (6, 5),
    (8, 5),
];

const GCAL_2: &[(usize, usize)] = &[
    (0, 7),
    (1, 7),
    (2, 7),
    (8, 4),
    (4, 6),
    (8, 6),
    (8, 5),
    (3, 4),
    (1, 4),
    (8, 3),
];

fn union_graph(a: &[(usize, usize)], b: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut edges: Vec<(usize, usize)> = a.iter().chain(b).copied().collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}

fn main() {
    env_logger::init();

    let config = SimConfig::default();
    println!(
        "running {} agents, {} leaders, F = {} for {} rounds\n",
        config.num_agents, config.num_leaders, config.f, config.num_rounds
    );

    let base = Network::from_config(&config).unwrap();
    let mut bp = base.clone();
    let mut w = base.clone();
    let mut sw = base;

    let union = union_graph(GCAL_1, GCAL_2);
    let mut census = Array1::<u32>::zeros(config.num_agents);
    let mut reference_rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let mut reference = config.leader_value;

    for t in 0..config.num_rounds {
        let graph = if t % 2 == 0 { GCAL_1 } else { GCAL_2 };
        bp.connect(graph).unwrap();
        w.connect(graph).unwrap();
        if t < config.window {
            sw.connect(graph).unwrap();
        } else {
            sw.connect(&union).unwrap();
        }

        let new_value = reference_rng.gen_range(-1000..1000) as f64;
        if config.leader_step > 0 && t > 0 && t % config.leader_step == 0 {
            reference = new_value;
        }
        for net in [&mut bp, &mut w, &mut sw] {
            net.update_leader_states(new_value, t, config.leader_step);
            net.connect_adversaries();
        }

        bp.run_round(
            t,
            &Algorithm::BpMsr {
                forced_activation: None,
            },
        )
        .unwrap();
        w.run_round(t, &Algorithm::WMsr).unwrap();
        sw.run_round(
            t,
            &Algorithm::SwMsr {
                window: config.window,
            },
        )
        .unwrap();

        for (total, q) in census.iter_mut().zip(bp.current_activations()) {
            *total += u32::from(q);
        }
    }

    println!("sum of activations across rounds (BP-MSR network): {census}\n");

    let traces: Vec<(&str, RunTrace)> = [("W-MSR", &w), ("SW-MSR", &sw), ("BP-MSR", &bp)]
        .into_iter()
        .map(|(name, net)| (name, RunTrace::capture(net)))
        .collect();

    println!("final reference value: {reference:.1}");
    for (name, trace) in &traces {
        println!(
            "{:<7} final states: {:6.1}  (max follower error {:.3})",
            name,
            trace.final_states(),
            trace.final_follower_error(reference)
        );
    }

    if let Some(path) = std::env::args().nth(1) {
        let file = File::create(&path).unwrap();
        serde_json::to_writer_pretty(BufWriter::new(file), &traces).unwrap();
        println!("\ntraces written to {path}");
    }
}
