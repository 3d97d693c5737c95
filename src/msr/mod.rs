//! The MSR (Mean-Subsequence-Reduced) consensus-update family.
//!
//! All three variants share the same trimmed-mean core and differ only in
//! when an agent is allowed to consume its inbox:
//!
//! | Variant | Updates |
//! |---------|---------|
//! | [`Algorithm::WMsr`] | every round |
//! | [`Algorithm::SwMsr`] | every `window` rounds (plus the first `window`) |
//! | [`Algorithm::BpMsr`] | only while the BP activation flag is set |

pub mod trimmed;

pub use trimmed::trimmed_consensus_update;

/// Per-round consensus rule selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Plain W-MSR: every correct agent aggregates every round.
    WMsr,
    /// Sliding-window W-MSR: aggregate when `(t + 1) % window == 0 || t < window`.
    SwMsr {
        /// Window length `T` in rounds (must be >= 1)
        window: usize,
    },
    /// Percolation-gated W-MSR: aggregate only when the BP flag is 1.
    BpMsr {
        /// Activation value all adversaries are forced to broadcast this
        /// round, if the experiment overrides their default (0).
        forced_activation: Option<u8>,
    },
}

impl Algorithm {
    /// Short name for logging and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::WMsr => "W-MSR",
            Algorithm::SwMsr { .. } => "SW-MSR",
            Algorithm::BpMsr { .. } => "BP-MSR",
        }
    }
}

/// Whether SW-MSR consumes the inbox at round `t` for window `T`.
///
/// True on every `T`-th round and unconditionally during the first `T`
/// rounds (seeding the history before the window pattern settles).
pub(crate) fn sw_window_open(t: usize, window: usize) -> bool {
    (t + 1) % window == 0 || t < window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_names() {
        assert_eq!(Algorithm::WMsr.name(), "W-MSR");
        assert_eq!(Algorithm::SwMsr { window: 2 }.name(), "SW-MSR");
        assert_eq!(
            Algorithm::BpMsr {
                forced_activation: None
            }
            .name(),
            "BP-MSR"
        );
    }

    #[test]
    fn test_sw_window_schedule_t2() {
        // With T=2 the inbox is consumed at rounds 0, 1, 3, 5, 7, ...
        let open: Vec<usize> = (0..8).filter(|&t| sw_window_open(t, 2)).collect();
        assert_eq!(open, vec![0, 1, 3, 5, 7]);
    }

    #[test]
    fn test_sw_window_one_is_every_round() {
        assert!((0..10).all(|t| sw_window_open(t, 1)));
    }
}
