//! Trimmed-mean consensus update (the W-MSR core)
//!
//! Shared by all three MSR variants. Guarantees resilience against up to
//! `f` values injected below and `f` values injected above the agent's own
//! state per round.

use crate::error::PercoError;

/// One trimmed-mean consensus step for a scalar state.
///
/// Partitions `received` relative to `own`:
///
/// - `O` — values strictly smaller than `own`
/// - `C` — values equal to `own`, merged with `own` itself
/// - `H` — values strictly larger than `own`
///
/// The `f` smallest entries of `O` and the `f` largest entries of `H` are
/// dropped, and the new state is the arithmetic mean of the remaining union.
/// `own` always survives trimming, so an empty `received` leaves the state
/// unchanged.
///
/// # Adversary Tolerance
///
/// Up to `f` arbitrary values below `own` and `f` above it are discarded
/// before averaging, so the result stays within the convex hull of the
/// correct values and `own` under the F-local adversary model.
///
/// # Arguments
///
/// * `own` - The agent's current state (always retained as an anchor)
/// * `received` - Values received from in-neighbors this round
/// * `f` - Per-side trim count (max adversarial values to discard per side)
pub fn trimmed_consensus_update(
    own: f64,
    received: &[f64],
    f: usize,
) -> Result<f64, PercoError> {
    let mut lower: Vec<f64> = received.iter().copied().filter(|&v| v < own).collect();
    let mut upper: Vec<f64> = received.iter().copied().filter(|&v| v > own).collect();
    let equal = received.iter().filter(|&&v| v == own).count();

    lower.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    upper.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Drop the f smallest below and the f largest above
    let lower = &lower[f.min(lower.len())..];
    let upper = &upper[..upper.len().saturating_sub(f)];

    // own plus its equals always remain
    let remaining = lower.len() + upper.len() + equal + 1;
    if remaining == 0 {
        return Err(PercoError::InvalidTrimBound { f, remaining });
    }

    let sum: f64 = lower.iter().sum::<f64>()
        + upper.iter().sum::<f64>()
        + own * (equal + 1) as f64;
    Ok(sum / remaining as f64)
}
