// src/strategy/implementations.rs

use crate::error::SimError;
use crate::simulation::metrics::{mean_squared_error, stockout_days, sum_under_target};
use crate::strategy::traits::{RewardContext, RewardFunction};

// =========================================================================
// 1. Stockout Penalty
// =========================================================================

/// Rewards keeping the shelf non-empty while buying as little as possible.
///
/// Formula: Reward = Base - Penalty * EmptyDays - TotalOrdered
#[derive(Debug, Clone, Copy)]
pub struct StockoutPenalty {
    pub base: f64,
    pub penalty_per_empty_day: f64,
}

impl Default for StockoutPenalty {
    fn default() -> Self {
        Self {
            base: 1000.0,
            penalty_per_empty_day: 4.0,
        }
    }
}

impl RewardFunction for StockoutPenalty {
    fn reward(&self, context: &RewardContext<'_>) -> Result<f64, SimError> {
        let empty_days = stockout_days(context.history) as f64;
        Ok(self.base - self.penalty_per_empty_day * empty_days - context.total_ordered() as f64)
    }
}

// =========================================================================
// 2. Mean Squared Error
// =========================================================================

/// Penalises any deviation from the target, above or below.
#[derive(Debug, Clone, Copy)]
pub struct MeanSquaredErrorReward {
    pub target: u32,
}

impl RewardFunction for MeanSquaredErrorReward {
    fn reward(&self, context: &RewardContext<'_>) -> Result<f64, SimError> {
        Ok(-(mean_squared_error(context.history, self.target)? as f64))
    }
}

// =========================================================================
// 3. Shortfall
// =========================================================================

/// Penalises only under-stocking; surplus stock is free.
#[derive(Debug, Clone, Copy)]
pub struct ShortfallReward {
    pub target: u32,
}

impl RewardFunction for ShortfallReward {
    fn reward(&self, context: &RewardContext<'_>) -> Result<f64, SimError> {
        Ok(-(sum_under_target(context.history, self.target) as f64))
    }
}

// =========================================================================
// 4. Constant
// =========================================================================

/// Always returns the same value, whatever happened.
#[derive(Debug, Clone, Copy)]
pub struct ConstantReward(pub f64);

impl RewardFunction for ConstantReward {
    fn reward(&self, _context: &RewardContext<'_>) -> Result<f64, SimError> {
        Ok(self.0)
    }
}
