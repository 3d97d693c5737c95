//! Network orchestration: topology rewiring, adversary injection, and the
//! three per-round consensus routines.
//!
//! The orchestrator owns the correct agents (leaders first, then followers)
//! and a central index-based adjacency list, so the time-varying directed
//! graph never embeds agent-to-agent references. Each round is strictly
//! phased: rewire, exchange, aggregate, tear edges down. Within a BP sweep
//! the agents are processed sequentially in index order, so an activation
//! signal can travel several hops across the `num_followers + 1` sweeps of
//! a single BP-MSR round.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agent::{Agent, ADVERSARY_ID_BASE};
use crate::config::SimConfig;
use crate::error::PercoError;
use crate::msr::Algorithm;

/// The agent collection plus this round's topology.
///
/// `Clone` yields an identically-initialized network (same agents, same RNG
/// stream), which is how comparison experiments run several algorithms from
/// the same starting conditions.
#[derive(Clone, Debug)]
pub struct Network {
    agents: Vec<Agent>,
    edges: Vec<Vec<usize>>,
    adversaries: Vec<Agent>,
    adv_edges: Vec<Vec<usize>>,
    num_leaders: usize,
    f: usize,
    rng: StdRng,
}

impl Network {
    /// Build a network of `num_leaders` leaders holding `leader_value` and
    /// `num_agents - num_leaders` followers with random initial states drawn
    /// from the seeded generator.
    pub fn new(
        num_leaders: usize,
        num_agents: usize,
        f: usize,
        leader_value: f64,
        seed: u64,
    ) -> Result<Self, PercoError> {
        if num_leaders == 0 || num_agents <= num_leaders {
            return Err(PercoError::EmptyNetwork {
                num_leaders,
                num_agents,
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut agents = Vec::with_capacity(num_agents);
        for id in 0..num_leaders {
            agents.push(Agent::leader(id, leader_value, f));
        }
        for id in num_leaders..num_agents {
            agents.push(Agent::random_follower(id, f, &mut rng));
        }
        Ok(Self::from_parts(agents, num_leaders, f, rng))
    }

    /// Build a network with explicit follower initial states (deterministic
    /// experiments and tests).
    pub fn with_follower_states(
        num_leaders: usize,
        leader_value: f64,
        follower_states: &[f64],
        f: usize,
        seed: u64,
    ) -> Result<Self, PercoError> {
        let num_agents = num_leaders + follower_states.len();
        if num_leaders == 0 || follower_states.is_empty() {
            return Err(PercoError::EmptyNetwork {
                num_leaders,
                num_agents,
            });
        }
        let rng = StdRng::seed_from_u64(seed);
        let mut agents = Vec::with_capacity(num_agents);
        for id in 0..num_leaders {
            agents.push(Agent::leader(id, leader_value, f));
        }
        for (k, &value) in follower_states.iter().enumerate() {
            agents.push(Agent::follower(num_leaders + k, value, f));
        }
        Ok(Self::from_parts(agents, num_leaders, f, rng))
    }

    /// Build a network from a [`SimConfig`].
    pub fn from_config(config: &SimConfig) -> Result<Self, PercoError> {
        Self::new(
            config.num_leaders,
            config.num_agents,
            config.f,
            config.leader_value,
            config.seed,
        )
    }

    fn from_parts(agents: Vec<Agent>, num_leaders: usize, f: usize, rng: StdRng) -> Self {
        let n = agents.len();
        Self {
            agents,
            edges: vec![Vec::new(); n],
            adversaries: Vec::new(),
            adv_edges: Vec::new(),
            num_leaders,
            f,
            rng,
        }
    }

    /// The correct agents (leaders first, then followers).
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// This round's injected adversaries (empty until
    /// [`Network::connect_adversaries`] runs).
    pub fn adversaries(&self) -> &[Agent] {
        &self.adversaries
    }

    /// Number of leaders.
    pub fn num_leaders(&self) -> usize {
        self.num_leaders
    }

    /// Number of followers.
    pub fn num_followers(&self) -> usize {
        self.agents.len() - self.num_leaders
    }

    /// The adversarial-tolerance parameter `F`.
    pub fn f(&self) -> usize {
        self.f
    }

    /// Current activation flag of every correct agent, in agent order.
    /// Summed across rounds by the caller to build the activation census.
    pub fn current_activations(&self) -> Vec<u8> {
        self.agents.iter().map(Agent::activation).collect()
    }

    /// Add directed edges `(source, destination)` by index into the
    /// correct-agent collection. Edges accumulate across calls until the
    /// round's teardown; callers apply exactly one topology per round.
    pub fn connect(&mut self, edge_list: &[(usize, usize)]) -> Result<(), PercoError> {
        let len = self.agents.len();
        for &(i, j) in edge_list {
            let index = if i >= len { i } else { j };
            if i >= len || j >= len {
                return Err(PercoError::UnknownAgentIndex { index, len });
            }
            self.edges[i].push(j);
        }
        Ok(())
    }

    /// Inject `F` fresh Byzantine adversaries (ids `100 + k`), each with
    /// outgoing edges to every follower. Leaders are never targeted.
    /// Replaces any adversaries from the previous round.
    pub fn connect_adversaries(&mut self) {
        let follower_targets: Vec<usize> = (self.num_leaders..self.agents.len()).collect();
        self.adversaries = (0..self.f)
            .map(|k| Agent::byzantine(ADVERSARY_ID_BASE + k, self.f, &mut self.rng))
            .collect();
        self.adv_edges = vec![follower_targets; self.f];
    }

    /// Overwrite every leader's state with `new_value` on rounds where
    /// `t > 0 && t % step == 0`; all other rounds are a no-op.
    pub fn update_leader_states(&mut self, new_value: f64, t: usize, step: usize) {
        if step == 0 || t == 0 || t % step != 0 {
            return;
        }
        debug!("round {t}: leader reference reset to {new_value}");
        for leader in &mut self.agents[..self.num_leaders] {
            leader.set_state(new_value);
        }
    }

    /// Run one full round of the selected algorithm at round index `t`.
    pub fn run_round(&mut self, t: usize, algorithm: &Algorithm) -> Result<(), PercoError> {
        debug!("{} round {t}", algorithm.name());
        match algorithm {
            Algorithm::WMsr => self.run_w_msr(),
            Algorithm::SwMsr { window } => self.run_sw_msr(t, *window),
            Algorithm::BpMsr { forced_activation } => self.run_bp_msr(*forced_activation),
        }
    }

    /// One W-MSR round: every correct agent is forced active, broadcasts its
    /// state, aggregates, and the topology is torn down.
    pub fn run_w_msr(&mut self) -> Result<(), PercoError> {
        for agent in &mut self.agents {
            agent.force_activation(1);
        }
        self.broadcast_states();
        for agent in &mut self.agents {
            agent.w_msr_update()?;
        }
        self.reset_edges();
        Ok(())
    }

    /// One SW-MSR round: as W-MSR, but the inbox is consumed only on window
    /// rounds.
    pub fn run_sw_msr(&mut self, t: usize, window: usize) -> Result<(), PercoError> {
        if window == 0 {
            return Err(PercoError::InvalidWindow(window));
        }
        for agent in &mut self.agents {
            agent.force_activation(1);
        }
        self.broadcast_states();
        for agent in &mut self.agents {
            agent.sw_msr_update(t, window)?;
        }
        self.reset_edges();
        Ok(())
    }

    /// One BP-MSR round: `num_followers + 1` BP sweeps with threshold
    /// `r = 2F + 1` over the full set (correct + adversarial), then the
    /// activation-gated exchange and aggregation.
    ///
    /// `forced_activation` overrides the value every adversary broadcasts
    /// during the sweeps (default 0).
    pub fn run_bp_msr(&mut self, forced_activation: Option<u8>) -> Result<(), PercoError> {
        let r = 2 * self.f as u32 + 1;
        for _ in 0..self.num_followers() + 1 {
            self.bp_sweep(r, forced_activation);
        }
        self.broadcast_states();
        for agent in &mut self.agents {
            agent.bp_msr_update()?;
        }
        self.reset_edges();
        Ok(())
    }

    /// One sequential BP sweep over correct agents then adversaries.
    /// Delivery is immediate, so agents later in the order already see
    /// signals sent earlier in the same sweep.
    fn bp_sweep(&mut self, r: u32, forced_activation: Option<u8>) {
        for i in 0..self.agents.len() {
            let targets = self.edges[i].clone();
            let messages = self.agents[i].bp_begin(None, &targets);
            for (j, q) in messages {
                self.agents[j].receive_activation(q);
            }
            self.agents[i].bp_finish(r);
        }
        for k in 0..self.adversaries.len() {
            let targets = self.adv_edges[k].clone();
            let messages = self.adversaries[k].bp_begin(forced_activation, &targets);
            for (j, q) in messages {
                self.agents[j].receive_activation(q);
            }
            self.adversaries[k].bp_finish(r);
        }
    }

    /// State exchange phase: every correct agent broadcasts along its
    /// outgoing edges, gated by its own activation flag.
    fn broadcast_states(&mut self) {
        for i in 0..self.agents.len() {
            let targets = self.edges[i].clone();
            let messages = self.agents[i].state_messages(&targets);
            for (j, v) in messages {
                self.agents[j].receive_state(v);
            }
        }
    }

    /// Topology teardown: the graph is fully replaced next round.
    fn reset_edges(&mut self) {
        for targets in &mut self.edges {
            targets.clear();
        }
    }
}
