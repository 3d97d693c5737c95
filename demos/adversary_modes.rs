//! Compare BP-MSR convergent sets under the two adversary signaling modes
//!
//! Adversaries cannot raise their own activation (the percolation threshold
//! ignores them), but they choose what they broadcast. Signaling 0 everywhere
//! shrinks the set of followers that ever activate to its minimum; signaling
//! 1 everywhere hands every follower an extra vote and yields the maximum
//! convergent set. Two identically-initialized networks run both modes side
//! by side over the periodic three-graph sequence.

use ndarray::Array1;
use perco_msr::{Algorithm, Network, SimConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

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

const GCAL_3: &[(usize, usize)] = &[
    (0, 5),
    (1, 5),
    (2, 5),
    (8, 5),
    (8, 3),
    (8, 4),
    (1, 3),
    (2, 3),
    (3, 4),
    (5, 4),
];

fn main() {
    env_logger::init();

    let config = SimConfig::default();
    println!(
        "running {} agents, {} leaders, F = {} for {} rounds\n",
        config.num_agents, config.num_leaders, config.f, config.num_rounds
    );

    let base = Network::from_config(&config).unwrap();
    let mut quiet = base.clone();
    let mut loud = base;

    let graphs = [GCAL_1, GCAL_2, GCAL_3];
    let mut quiet_census = Array1::<u32>::zeros(config.num_agents);
    let mut loud_census = Array1::<u32>::zeros(config.num_agents);
    let mut reference_rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));

    for t in 0..config.num_rounds {
        let graph = graphs[t % graphs.len()];
        let new_value = reference_rng.gen_range(-1000..1000) as f64;

        for (net, input) in [(&mut quiet, 0), (&mut loud, 1)] {
            net.connect(graph).unwrap();
            net.update_leader_states(new_value, t, config.leader_step);
            net.connect_adversaries();
            net.run_round(
                t,
                &Algorithm::BpMsr {
                    forced_activation: Some(input),
                },
            )
            .unwrap();
        }

        for (total, q) in quiet_census.iter_mut().zip(quiet.current_activations()) {
            *total += u32::from(q);
        }
        for (total, q) in loud_census.iter_mut().zip(loud.current_activations()) {
            *total += u32::from(q);
        }
    }

    println!("adversaries signal 0 (min convergent set): {quiet_census}");
    println!("adversaries signal 1 (max convergent set): {loud_census}");

    let activated = |census: &Array1<u32>| census.iter().filter(|&&c| c > 0).count();
    println!(
        "\nfollowers ever active: {} (min) vs {} (max) of {}",
        activated(&quiet_census) - config.num_leaders,
        activated(&loud_census) - config.num_leaders,
        config.num_agents - config.num_leaders
    );
}
