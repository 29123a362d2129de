// src/simulation/metrics.rs

//! Post-run reductions of an [`AvailabilityHistory`] to a single number.
//!
//! Every function here is pure: it only reads the finished history.

use crate::error::SimError;
use crate::simulation::history::AvailabilityHistory;

/// Calculates the mean squared deviation of availability from `target`.
///
/// Formula: MSE = round( Σ (target - available)² / days )
///
/// Halves round to the nearest even integer.
///
/// # Errors
/// [`SimError::EmptyHistory`] if nothing was recorded, which happens when the
/// run was shorter than one day.
pub fn mean_squared_error(history: &AvailabilityHistory, target: u32) -> Result<u64, SimError> {
    if history.is_empty() {
        return Err(SimError::EmptyHistory);
    }

    let sum_of_squares: f64 = history
        .values()
        .map(|available| {
            let error = f64::from(target) - f64::from(available);
            error * error
        })
        .sum();

    Ok((sum_of_squares / history.len() as f64).round_ties_even() as u64)
}

/// Calculates the total under-stocking across all recorded days.
///
/// Formula: Σ (target - available) over days where available < target
///
/// Days at or above the target contribute nothing, so the result is never
/// negative and is 0 when the target was met every day.
pub fn sum_under_target(history: &AvailabilityHistory, target: u32) -> u64 {
    history
        .values()
        .filter(|available| *available < target)
        .map(|available| u64::from(target - available))
        .sum()
}

/// Number of recorded days on which nothing at all was available.
pub fn stockout_days(history: &AvailabilityHistory) -> u64 {
    history.values().filter(|available| *available == 0).count() as u64
}
