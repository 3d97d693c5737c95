//! Simulation configuration

use serde::{Deserialize, Serialize};

/// Parameters of a simulation run.
///
/// The defaults reproduce the reference experiment: nine agents, three of
/// them leaders, one adversary per round, a hundred rounds with the leader
/// reference resetting every fifty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Adversarial-tolerance parameter `F` (per-side trim count, and number
    /// of adversaries injected per round)
    pub f: usize,
    /// Number of leader agents (occupying the lowest indices)
    pub num_leaders: usize,
    /// Total number of correct agents, leaders included
    pub num_agents: usize,
    /// Initial (and reset) leader reference value
    pub leader_value: f64,
    /// Total rounds to simulate
    pub num_rounds: usize,
    /// Leader states are overwritten every `leader_step` rounds (0 disables)
    pub leader_step: usize,
    /// SW-MSR window length `T`
    pub window: usize,
    /// Seed for follower initial states and adversary draws
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            f: 1,
            num_leaders: 3,
            num_agents: 9,
            leader_value: 0.0,
            num_rounds: 100,
            leader_step: 50,
            window: 2,
            seed: 0,
        }
    }
}
