// src/strategy/traits.rs

use crate::error::SimError;
use crate::model::purchase_order::PurchaseOrder;
use crate::simulation::history::AvailabilityHistory;

/// What a reward function gets to look at after a finished run.
#[derive(Debug, Clone, Copy)]
pub struct RewardContext<'a> {
    /// Availability recorded during the run.
    pub history: &'a AvailabilityHistory,
    /// The purchase orders the run was built from.
    pub orders: &'a [PurchaseOrder],
}

impl<'a> RewardContext<'a> {
    pub fn new(history: &'a AvailabilityHistory, orders: &'a [PurchaseOrder]) -> Self {
        Self { history, orders }
    }

    /// Total number of items bought across all orders.
    pub fn total_ordered(&self) -> u64 {
        self.orders.iter().map(|order| u64::from(order.quantity)).sum()
    }
}

/// Scores a finished run. Higher is better.
///
/// The optimizer only ever talks to this trait, so swapping the scoring rule
/// never touches the scheduler or the processes.
pub trait RewardFunction {
    fn reward(&self, context: &RewardContext<'_>) -> Result<f64, SimError>;
}

impl<F> RewardFunction for F
where
    F: Fn(&RewardContext<'_>) -> Result<f64, SimError>,
{
    fn reward(&self, context: &RewardContext<'_>) -> Result<f64, SimError> {
        self(context)
    }
}
