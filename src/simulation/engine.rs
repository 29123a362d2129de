// src/simulation/engine.rs

use crate::error::SimError;
use crate::model::inventory::Inventory;
use crate::model::purchase_order::PurchaseOrder;
use crate::simulation::clock::SimTime;
use crate::simulation::config::SimulationConfig;
use crate::simulation::history::AvailabilityHistory;
use crate::simulation::processes::{
    Aging, AvailabilityMonitor, Clearout, PurchaseFulfillment, Sales, ShelfState,
};
use crate::simulation::scheduler::Scheduler;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// One run of the shelf over simulated time.
///
/// Processes are registered in a fixed order (aging, clearout, sales,
/// purchase fulfillment, availability monitor) so that on any given day the
/// monitor sees the effect of everything else that happened that day.
pub struct Simulation {
    config: SimulationConfig,
    scheduler: Scheduler<ShelfState>,
    state: ShelfState,
}

impl Simulation {
    /// Sets up a fresh shelf for `purchase_orders`.
    ///
    /// The orders are copied, so later changes to the caller's list do not
    /// affect this run.
    pub fn new(
        purchase_orders: &[PurchaseOrder],
        config: SimulationConfig,
        seed: u64,
    ) -> Result<Self, SimError> {
        let sales = config.sales.map(|gap| gap.sampler()).transpose()?;
        if let Some(interval) = config.clearout_interval {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(SimError::InvalidInterval(interval));
            }
        }

        let mut scheduler: Scheduler<ShelfState> = Scheduler::new();
        if config.aging {
            scheduler.register(Box::new(Aging::new()))?;
        }
        if let Some(interval) = config.clearout_interval {
            scheduler.register(Box::new(Clearout::new(interval, config.age_limit)))?;
        }
        if let Some(sampler) = sales {
            scheduler.register(Box::new(Sales::new(sampler)))?;
        }
        scheduler.register(Box::new(PurchaseFulfillment::new(purchase_orders)))?;
        scheduler.register(Box::new(AvailabilityMonitor::new(
            config.age_limit,
            config.availability,
        )))?;

        let state = ShelfState {
            inventory: Inventory::from_ages(&config.initial_ages),
            history: AvailabilityHistory::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };

        Ok(Self {
            config,
            scheduler,
            state,
        })
    }

    /// Advances the run up to and including day `until`. A later call with a
    /// larger bound continues where this one stopped.
    pub fn run(&mut self, until: SimTime) -> Result<&AvailabilityHistory, SimError> {
        self.scheduler.run(until, &mut self.state)?;
        debug!(
            until,
            recorded_days = self.state.history.len(),
            on_shelf = self.state.inventory.len(),
            "simulation advanced"
        );
        Ok(&self.state.history)
    }

    /// Runs for the configured `run_length`.
    pub fn run_to_end(&mut self) -> Result<&AvailabilityHistory, SimError> {
        let until = self.config.run_length;
        self.run(until)
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.state.inventory
    }

    pub fn history(&self) -> &AvailabilityHistory {
        &self.state.history
    }

    pub fn into_history(self) -> AvailabilityHistory {
        self.state.history
    }
}
