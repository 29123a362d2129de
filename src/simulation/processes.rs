// src/simulation/processes.rs

//! The inventory processes driven by the [`Scheduler`](super::scheduler::Scheduler).
//!
//! Periodic processes first wait one period and then act, so nothing happens
//! at the instant a run starts.

use crate::error::SimError;
use crate::model::demand::InterArrivalSampler;
use crate::model::inventory::Inventory;
use crate::model::purchase_order::PurchaseOrder;
use crate::simulation::clock::SimTime;
use crate::simulation::config::AvailabilityMode;
use crate::simulation::history::AvailabilityHistory;
use crate::simulation::scheduler::{Process, Yield};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Everything the processes of one run share. Recreated for every run.
#[derive(Debug, Clone)]
pub struct ShelfState {
    pub inventory: Inventory,
    pub history: AvailabilityHistory,
    pub rng: ChaCha8Rng,
}

// =========================================================================
// 1. Aging
// =========================================================================

/// Adds one day to every item on the shelf, once per day.
#[derive(Debug, Clone, Default)]
pub struct Aging {
    started: bool,
}

impl Aging {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Process<ShelfState> for Aging {
    fn name(&self) -> &str {
        "aging"
    }

    fn resume(&mut self, _now: SimTime, state: &mut ShelfState) -> Result<Yield, SimError> {
        if self.started {
            state.inventory.age_all();
        }
        self.started = true;
        Ok(Yield::Timeout(1.0))
    }
}

// =========================================================================
// 2. Clearout
// =========================================================================

/// Throws away expired items every `interval` days.
#[derive(Debug, Clone)]
pub struct Clearout {
    interval: SimTime,
    age_limit: u32,
    started: bool,
}

impl Clearout {
    pub fn new(interval: SimTime, age_limit: u32) -> Self {
        Self {
            interval,
            age_limit,
            started: false,
        }
    }
}

impl Process<ShelfState> for Clearout {
    fn name(&self) -> &str {
        "clearout"
    }

    fn resume(&mut self, now: SimTime, state: &mut ShelfState) -> Result<Yield, SimError> {
        if self.started {
            let removed = state.inventory.clear_expired(self.age_limit);
            if removed > 0 {
                trace!(at = now, removed, "cleared expired items");
            }
        }
        self.started = true;
        Ok(Yield::Timeout(self.interval))
    }
}

// =========================================================================
// 3. Sales
// =========================================================================

/// Sells the oldest item whenever a customer arrives.
#[derive(Debug, Clone)]
pub struct Sales {
    inter_arrival: InterArrivalSampler,
    started: bool,
}

impl Sales {
    pub fn new(inter_arrival: InterArrivalSampler) -> Self {
        Self {
            inter_arrival,
            started: false,
        }
    }
}

impl Process<ShelfState> for Sales {
    fn name(&self) -> &str {
        "sales"
    }

    fn resume(&mut self, now: SimTime, state: &mut ShelfState) -> Result<Yield, SimError> {
        if self.started {
            match state.inventory.sell_oldest() {
                Some(item) => trace!(at = now, age = item.age, "sold item"),
                None => trace!(at = now, "customer found an empty shelf"),
            }
        }
        self.started = true;
        Ok(Yield::Timeout(self.inter_arrival.sample(&mut state.rng)))
    }
}

// =========================================================================
// 4. Purchase fulfillment
// =========================================================================

/// Delivers each purchase order on its scheduled day, earliest first.
#[derive(Debug, Clone)]
pub struct PurchaseFulfillment {
    pending: VecDeque<PurchaseOrder>,
    waiting: bool,
}

impl PurchaseFulfillment {
    /// Takes its own copy of the orders, sorted by day. Orders for the same
    /// day keep their relative order.
    pub fn new(orders: &[PurchaseOrder]) -> Self {
        let mut sorted = orders.to_vec();
        sorted.sort_by_key(|order| order.scheduled_day);

        Self {
            pending: sorted.into(),
            waiting: false,
        }
    }
}

impl Process<ShelfState> for PurchaseFulfillment {
    fn name(&self) -> &str {
        "purchase_fulfillment"
    }

    fn resume(&mut self, now: SimTime, state: &mut ShelfState) -> Result<Yield, SimError> {
        // The order we slept for is due now, whatever float rounding says.
        if self.waiting {
            if let Some(order) = self.pending.pop_front() {
                state.inventory.receive(order.quantity);
            }
            self.waiting = false;
        }

        // Same-day and late orders are delivered straight away.
        while let Some(order) = self.pending.front().copied() {
            let day = SimTime::from(order.scheduled_day);
            if day > now {
                break;
            }
            if day < now {
                debug!(
                    scheduled_day = order.scheduled_day,
                    at = now,
                    "purchase order is behind the clock, delivering immediately"
                );
            }
            state.inventory.receive(order.quantity);
            self.pending.pop_front();
        }

        match self.pending.front() {
            Some(order) => {
                self.waiting = true;
                Ok(Yield::Timeout(SimTime::from(order.scheduled_day) - now))
            }
            None => Ok(Yield::Finish),
        }
    }
}

// =========================================================================
// 5. Availability monitor
// =========================================================================

/// Records how many items are available at the end of every day.
#[derive(Debug, Clone)]
pub struct AvailabilityMonitor {
    age_limit: u32,
    mode: AvailabilityMode,
    started: bool,
}

impl AvailabilityMonitor {
    pub fn new(age_limit: u32, mode: AvailabilityMode) -> Self {
        Self {
            age_limit,
            mode,
            started: false,
        }
    }
}

impl Process<ShelfState> for AvailabilityMonitor {
    fn name(&self) -> &str {
        "availability_monitor"
    }

    fn resume(&mut self, now: SimTime, state: &mut ShelfState) -> Result<Yield, SimError> {
        if self.started {
            let available = match self.mode {
                AvailabilityMode::Fresh => state.inventory.count_fresh(self.age_limit),
                AvailabilityMode::Total => state.inventory.len() as u32,
            };
            state.history.record(now.floor() as u32, available)?;
        }
        self.started = true;
        Ok(Yield::Timeout(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::scheduler::Scheduler;
    use rand::SeedableRng;

    fn shelf(ages: &[u32]) -> ShelfState {
        ShelfState {
            inventory: Inventory::from_ages(ages),
            history: AvailabilityHistory::new(),
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    fn ages(state: &ShelfState) -> Vec<u32> {
        state.inventory.iter().map(|item| item.age).collect()
    }

    #[test]
    fn aging_waits_a_day_before_acting() {
        let mut scheduler: Scheduler<ShelfState> = Scheduler::new();
        scheduler.register(Box::new(Aging::new())).unwrap();
        let mut state = shelf(&[0, 3]);

        scheduler.run(0.0, &mut state).unwrap();
        assert_eq!(ages(&state), vec![3, 0]);

        scheduler.run(2.0, &mut state).unwrap();
        assert_eq!(ages(&state), vec![5, 2]);
    }

    #[test]
    fn clearout_runs_on_its_own_interval() {
        let mut scheduler: Scheduler<ShelfState> = Scheduler::new();
        scheduler.register(Box::new(Clearout::new(7.0, 5))).unwrap();
        let mut state = shelf(&[9, 1]);

        scheduler.run(6.0, &mut state).unwrap();
        assert_eq!(state.inventory.len(), 2);

        scheduler.run(7.0, &mut state).unwrap();
        assert_eq!(ages(&state), vec![1]);
    }

    #[test]
    fn sales_empty_the_shelf_oldest_first() {
        let sampler = crate::model::demand::InterArrival::Fixed(1.0)
            .sampler()
            .unwrap();
        let mut scheduler: Scheduler<ShelfState> = Scheduler::new();
        scheduler.register(Box::new(Sales::new(sampler))).unwrap();
        let mut state = shelf(&[2, 8, 5]);

        scheduler.run(2.0, &mut state).unwrap();
        assert_eq!(ages(&state), vec![2]);

        scheduler.run(10.0, &mut state).unwrap();
        assert!(state.inventory.is_empty());
    }

    #[test]
    fn fulfillment_delivers_in_day_order() {
        let orders = [
            PurchaseOrder::new(4, 2),
            PurchaseOrder::new(1, 5),
            PurchaseOrder::new(4, 1),
        ];
        let mut scheduler: Scheduler<ShelfState> = Scheduler::new();
        scheduler
            .register(Box::new(PurchaseFulfillment::new(&orders)))
            .unwrap();
        let mut state = shelf(&[]);

        scheduler.run(0.0, &mut state).unwrap();
        assert_eq!(state.inventory.len(), 0);

        scheduler.run(1.0, &mut state).unwrap();
        assert_eq!(state.inventory.len(), 5);

        scheduler.run(4.0, &mut state).unwrap();
        assert_eq!(state.inventory.len(), 8);
        assert_eq!(scheduler.live_processes(), 0);
    }

    #[test]
    fn late_orders_are_delivered_immediately() {
        let mut scheduler: Scheduler<ShelfState> = Scheduler::new();
        let mut state = shelf(&[]);
        scheduler.run(10.0, &mut state).unwrap();

        let orders = [PurchaseOrder::new(3, 4), PurchaseOrder::new(12, 1)];
        scheduler
            .register(Box::new(PurchaseFulfillment::new(&orders)))
            .unwrap();

        scheduler.run(10.0, &mut state).unwrap();
        assert_eq!(state.inventory.len(), 4);

        scheduler.run(12.0, &mut state).unwrap();
        assert_eq!(state.inventory.len(), 5);
    }

    #[test]
    fn monitor_counts_total_or_fresh_items() {
        for (mode, expected) in [(AvailabilityMode::Fresh, 1), (AvailabilityMode::Total, 2)] {
            let mut scheduler: Scheduler<ShelfState> = Scheduler::new();
            scheduler
                .register(Box::new(AvailabilityMonitor::new(5, mode)))
                .unwrap();
            let mut state = shelf(&[1, 9]);

            scheduler.run(1.0, &mut state).unwrap();
            assert_eq!(state.history.iter().collect::<Vec<_>>(), vec![(1, expected)]);
        }
    }
}
