//! Agents: leaders, followers, and adversarial variants.
//!
//! An [`Agent`] holds a scalar consensus state, a binary BP activation flag,
//! and per-round inboxes. Behavior differences between the four kinds
//! (receive, propagate, BP step, aggregation) are dispatched on a closed
//! [`AgentKind`] tag rather than trait objects, keeping the capability table
//! explicit and the graph free of inter-agent references: agents address
//! each other by index, and the [`Network`](crate::network::Network)
//! delivers messages between the two halves of each protocol step.

use rand::Rng;

use crate::error::PercoError;
use crate::msr::{sw_window_open, trimmed_consensus_update};

/// Agent ids at or above this value are reserved for injected adversaries.
pub const ADVERSARY_ID_BASE: usize = 100;

/// The four agent behaviors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentKind {
    /// Authoritative reference agent: activation fixed at 1, ignores input,
    /// state externally settable on a schedule.
    Leader,
    /// Fully protocol-obedient agent.
    Follower,
    /// Ignores input, propagates unconditionally, never aggregates.
    Adversary,
    /// Adversary sending a distinct oscillating state value per receiver.
    Byzantine {
        /// Rounds elapsed since this agent was injected (drives the
        /// oscillation; ticks once per broadcast).
        elapsed: u32,
    },
}

impl AgentKind {
    /// Whether this kind ignores the nominal protocol.
    pub fn is_adversarial(&self) -> bool {
        matches!(self, AgentKind::Adversary | AgentKind::Byzantine { .. })
    }
}

/// A single consensus agent.
#[derive(Clone, Debug)]
pub struct Agent {
    id: usize,
    kind: AgentKind,
    x: f64,
    q: u8,
    inbox: Vec<f64>,
    activation_signals: u32,
    f: usize,
    state_history: Vec<f64>,
    activation_history: Vec<u8>,
}

impl Agent {
    fn new(id: usize, kind: AgentKind, x: f64, q: u8, f: usize) -> Self {
        Self {
            id,
            kind,
            x,
            q,
            inbox: Vec::new(),
            activation_signals: 0,
            f,
            state_history: vec![x],
            activation_history: Vec::new(),
        }
    }

    /// Create a leader holding the reference value. Activation is 1 forever.
    pub fn leader(id: usize, value: f64, f: usize) -> Self {
        Self::new(id, AgentKind::Leader, value, 1, f)
    }

    /// Create a follower with an explicit initial state.
    pub fn follower(id: usize, value: f64, f: usize) -> Self {
        Self::new(id, AgentKind::Follower, value, 0, f)
    }

    /// Create a follower with a random initial state in `[-1000, 1000]`.
    pub fn random_follower(id: usize, f: usize, rng: &mut impl Rng) -> Self {
        Self::follower(id, rng.gen_range(-1000..=1000) as f64, f)
    }

    /// Create a plain adversary broadcasting a fixed state value.
    pub fn adversary(id: usize, value: f64, f: usize, rng: &mut impl Rng) -> Self {
        Self::new(id, AgentKind::Adversary, value, rng.gen_range(0..=1), f)
    }

    /// Create a Byzantine adversary. Initial state is one of
    /// `{-1000, 0, 1000}`; its broadcasts oscillate per receiver.
    pub fn byzantine(id: usize, f: usize, rng: &mut impl Rng) -> Self {
        let x = (rng.gen_range(-1i32..=1) * 1000) as f64;
        let mut agent = Self::new(id, AgentKind::Byzantine { elapsed: 0 }, x, 0, f);
        agent.q = rng.gen_range(0..=1);
        agent
    }

    /// Agent identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Behavior kind.
    pub fn kind(&self) -> &AgentKind {
        &self.kind
    }

    /// Current scalar consensus state.
    pub fn state(&self) -> f64 {
        self.x
    }

    /// Current BP activation flag (0 or 1).
    pub fn activation(&self) -> u8 {
        self.q
    }

    /// Full state time series, one entry per round plus the initial value.
    pub fn state_history(&self) -> &[f64] {
        &self.state_history
    }

    /// Activation flag history, one entry per BP sweep.
    pub fn activation_history(&self) -> &[u8] {
        &self.activation_history
    }

    /// Overwrite the state. Used for leader reference resets and
    /// attacker-controlled adversary states.
    pub fn set_state(&mut self, value: f64) {
        self.x = value;
    }

    pub(crate) fn force_activation(&mut self, q: u8) {
        self.q = q;
    }

    /// Receive a state value from an in-neighbor. Leaders and adversarial
    /// kinds discard all input.
    pub fn receive_state(&mut self, value: f64) {
        if self.kind == AgentKind::Follower {
            self.inbox.push(value);
        }
    }

    /// Receive an activation signal from an in-neighbor.
    pub fn receive_activation(&mut self, value: u8) {
        if self.kind == AgentKind::Follower {
            self.activation_signals += u32::from(value);
        }
    }

    /// Compute this agent's outgoing state messages for one broadcast.
    ///
    /// Correct agents only share while their activation flag is set; an
    /// inactive agent neither trusts nor forwards information. Adversarial
    /// kinds share unconditionally, and the Byzantine variant crafts a
    /// receiver-dependent oscillation, keeping the last sent value as its
    /// own state.
    pub fn state_messages(&mut self, targets: &[usize]) -> Vec<(usize, f64)> {
        match &mut self.kind {
            AgentKind::Leader | AgentKind::Follower => {
                if self.q == 1 {
                    targets.iter().map(|&j| (j, self.x)).collect()
                } else {
                    Vec::new()
                }
            }
            AgentKind::Adversary => targets.iter().map(|&j| (j, self.x)).collect(),
            AgentKind::Byzantine { elapsed } => {
                *elapsed += 1;
                let t = f64::from(*elapsed);
                let mut messages = Vec::with_capacity(targets.len());
                for &j in targets {
                    self.x = -1000.0 * ((t + j as f64) / 5.0).sin();
                    messages.push((j, self.x));
                }
                messages
            }
        }
    }

    /// First half of a BP step: set a forced activation value (adversarial
    /// kinds only), record the flag to history, and emit activation
    /// messages. The orchestrator delivers them before calling
    /// [`Agent::bp_finish`].
    pub fn bp_begin(&mut self, forced: Option<u8>, targets: &[usize]) -> Vec<(usize, u8)> {
        if self.kind.is_adversarial() {
            self.q = forced.unwrap_or(0);
        }
        self.activation_history.push(self.q);
        match &mut self.kind {
            AgentKind::Leader | AgentKind::Follower => {
                if self.q == 1 {
                    targets.iter().map(|&j| (j, self.q)).collect()
                } else {
                    Vec::new()
                }
            }
            AgentKind::Adversary => targets.iter().map(|&j| (j, self.q)).collect(),
            AgentKind::Byzantine { elapsed } => {
                *elapsed += 1;
                targets.iter().map(|&j| (j, self.q)).collect()
            }
        }
    }

    /// Second half of a BP step: threshold the accumulated signals.
    ///
    /// A follower activates iff at least `r` in-neighbors signaled 1 this
    /// sweep; the accumulator then resets. Leaders never change their flag
    /// and adversarial kinds ignore the threshold entirely.
    pub fn bp_finish(&mut self, r: u32) {
        if self.kind == AgentKind::Follower {
            self.q = u8::from(self.activation_signals >= r);
            self.activation_signals = 0;
        }
    }

    /// W-MSR update: trimmed-mean aggregation of the inbox.
    ///
    /// Adversarial kinds skip aggregation and merely record their current
    /// (attacker-controlled) state. An empty inbox leaves the state
    /// unchanged since the own value anchors the mean.
    pub fn w_msr_update(&mut self) -> Result<(), PercoError> {
        if self.kind.is_adversarial() {
            self.state_history.push(self.x);
            self.inbox.clear();
            return Ok(());
        }
        self.x = trimmed_consensus_update(self.x, &self.inbox, self.f)?;
        self.state_history.push(self.x);
        self.inbox.clear();
        Ok(())
    }

    /// SW-MSR update: aggregate only on window rounds, otherwise carry the
    /// state forward without consuming the inbox.
    pub fn sw_msr_update(&mut self, t: usize, window: usize) -> Result<(), PercoError> {
        if window == 0 {
            return Err(PercoError::InvalidWindow(window));
        }
        if sw_window_open(t, window) {
            self.w_msr_update()
        } else {
            self.state_history.push(self.x);
            Ok(())
        }
    }

    /// BP-MSR update: aggregate only while activated; a sleeping agent
    /// discards its inbox and carries its state forward.
    pub fn bp_msr_update(&mut self) -> Result<(), PercoError> {
        if self.q == 0 {
            self.inbox.clear();
            self.state_history.push(self.x);
            return Ok(());
        }
        self.w_msr_update()
    }
}
