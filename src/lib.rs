//! # perco-msr
//!
//! Resilient leader-follower consensus over time-varying directed graphs,
//! with a Bootstrap Percolation activation sub-protocol.
//!
//! The crate simulates the Mean-Subsequence-Reduced (MSR) family of
//! trimmed-mean update rules under an F-local adversary model:
//!
//! - **W-MSR** — every correct agent trims the `F` lowest and `F` highest
//!   received values and averages the rest, every round.
//! - **SW-MSR** — the same rule applied on a sliding window, letting inboxes
//!   accumulate across closed rounds.
//! - **BP-MSR** — aggregation gated by a Bootstrap Percolation protocol:
//!   an agent only trusts (and forwards) information while at least
//!   `2F + 1` in-neighbors vouch for it, which quarantines followers that
//!   hear mostly from adversaries.
//!
//! ## Quick Start
//!
//! ```
//! use perco_msr::{Algorithm, Network, RunTrace};
//!
//! # fn main() -> Result<(), perco_msr::PercoError> {
//! // Three leaders at 0.0, two followers, tolerating one adversary
//! let mut network = Network::with_follower_states(3, 0.0, &[400.0, -250.0], 1, 42)?;
//!
//! for t in 0..20 {
//!     network.connect(&[(0, 3), (1, 3), (2, 3), (0, 4), (1, 4), (2, 4)])?;
//!     network.connect_adversaries();
//!     network.run_round(t, &Algorithm::WMsr)?;
//! }
//!
//! let trace = RunTrace::capture(&network);
//! assert!(trace.final_follower_error(0.0) < 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! Every round is synchronous and strictly phased: the caller wires this
//! round's directed graph with [`Network::connect`] (and optionally injects
//! fresh adversaries with [`Network::connect_adversaries`]), then
//! [`Network::run_round`] exchanges messages, aggregates, and tears the
//! topology down again.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod agent;
pub mod config;
pub mod error;
pub mod msr;
pub mod network;
pub mod trace;

pub use agent::{Agent, AgentKind, ADVERSARY_ID_BASE};
pub use config::SimConfig;
pub use error::PercoError;
pub use msr::{trimmed_consensus_update, Algorithm};
pub use network::Network;
pub use trace::{ActivationCensus, RunTrace};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
