//! Error types for perco-msr

use thiserror::Error;

/// All possible errors in perco-msr
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PercoError {
    /// An edge referenced an agent index outside the correct-agent collection
    #[error("Unknown agent index {index} (network has {len} correct agents)")]
    UnknownAgentIndex {
        /// The offending index from the edge list
        index: usize,
        /// Number of correct agents in the network
        len: usize,
    },

    /// Trimming left no values to average
    #[error("Invalid trim bound: F={f} left {remaining} values after trimming")]
    InvalidTrimBound {
        /// Trim parameter in effect
        f: usize,
        /// Values remaining after the trim
        remaining: usize,
    },

    /// SW-MSR called with a zero-length window
    #[error("Invalid SW-MSR window: {0} (must be >= 1)")]
    InvalidWindow(usize),

    /// A network needs at least one leader and at least as many agents as leaders
    #[error("Empty network: {num_leaders} leaders of {num_agents} agents")]
    EmptyNetwork {
        /// Configured leader count
        num_leaders: usize,
        /// Configured total agent count
        num_agents: usize,
    },
}
