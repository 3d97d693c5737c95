//! Run traces and the activation census.
//!
//! A [`RunTrace`] is a point-in-time snapshot of every correct agent's state
//! and activation history, laid out as dense matrices so experiments can be
//! serialized, diffed, and post-processed without touching live agents.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::network::Network;

/// Snapshot of a simulation's recorded histories.
///
/// Row `i` of [`RunTrace::states`] is agent `i`'s state trajectory, one
/// column per recorded round (the initial state included). Capture after the
/// final round to get the full run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunTrace {
    num_leaders: usize,
    states: Array2<f64>,
    activations: Vec<Vec<u8>>,
}

impl RunTrace {
    /// Snapshot the current histories of every correct agent.
    pub fn capture(network: &Network) -> Self {
        let agents = network.agents();
        let rounds = agents
            .iter()
            .map(|a| a.state_history().len())
            .max()
            .unwrap_or(0);
        let mut states = Array2::zeros((agents.len(), rounds));
        for (i, agent) in agents.iter().enumerate() {
            for (t, &x) in agent.state_history().iter().enumerate() {
                states[[i, t]] = x;
            }
        }
        let activations = agents
            .iter()
            .map(|a| a.activation_history().to_vec())
            .collect();
        Self {
            num_leaders: network.num_leaders(),
            states,
            activations,
        }
    }

    /// State trajectories, one row per agent.
    pub fn states(&self) -> &Array2<f64> {
        &self.states
    }

    /// Activation histories, one entry per agent per BP sweep.
    pub fn activations(&self) -> &[Vec<u8>] {
        &self.activations
    }

    /// Every agent's state after the last recorded round.
    pub fn final_states(&self) -> Array1<f64> {
        let last = self.states.ncols() - 1;
        self.states.column(last).to_owned()
    }

    /// Largest distance of any follower's final state from `reference`.
    pub fn final_follower_error(&self, reference: f64) -> f64 {
        self.final_states()
            .iter()
            .skip(self.num_leaders)
            .map(|x| (x - reference).abs())
            .fold(0.0, f64::max)
    }

    /// Per-agent totals of recorded activation flags.
    pub fn activation_census(&self) -> ActivationCensus {
        let totals = self
            .activations
            .iter()
            .map(|history| history.iter().map(|&q| u32::from(q)).sum())
            .collect();
        ActivationCensus { totals }
    }
}

/// How often each agent was active across a run.
///
/// Leaders accumulate one count per recorded sweep; a follower that never
/// crossed the percolation threshold totals zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationCensus {
    totals: Array1<u32>,
}

impl ActivationCensus {
    /// Activation totals in agent order.
    pub fn per_agent(&self) -> &Array1<u32> {
        &self.totals
    }

    /// Sum over all agents.
    pub fn total(&self) -> u32 {
        self.totals.sum()
    }
}
