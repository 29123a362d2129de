// src/simulation/config.rs

use crate::model::demand::InterArrival;
use crate::simulation::clock::SimTime;

/// Which items the availability monitor counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityMode {
    /// Only items younger than the age limit.
    #[default]
    Fresh,
    /// Every item on the shelf, expired or not.
    Total,
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Days to simulate; the last recorded day equals this bound.
    pub run_length: SimTime,
    pub age_limit: u32,
    pub initial_ages: Vec<u32>,
    /// Whether items age at all. Off gives a static shelf.
    pub aging: bool,
    /// Days between clearouts of expired items, or `None` to never clear.
    pub clearout_interval: Option<SimTime>,
    /// Gap between customer sales, or `None` for no sales.
    pub sales: Option<InterArrival>,
    pub availability: AvailabilityMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            run_length: 365.0,
            age_limit: 100,
            initial_ages: vec![0, 0, 0, 1, 1, 5, 5, 10, 10, 50, 50, 80, 80],
            aging: true,
            clearout_interval: None,
            sales: None,
            availability: AvailabilityMode::Fresh,
        }
    }
}

/// How reward feedback updates the estimate of the chosen action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewardUpdate {
    /// The estimate becomes the latest reward.
    Absolute,
    /// The estimate becomes the change in reward since the previous
    /// iteration (0 on the first iteration).
    #[default]
    Delta,
}

/// When the random streams are seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Iteration `i` reseeds the optimizer with `seed + i` and runs its
    /// simulation with seed `seed + i`, so any iteration replays on its own.
    #[default]
    PerRun,
    /// One stream seeded at construction drives every choice and hands each
    /// simulation a fresh seed, so only the whole sequence replays.
    OncePerOptimizer,
}

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Probability of exploring a random action instead of exploiting.
    pub epsilon: f64,
    pub seed: u64,
    pub seed_policy: SeedPolicy,
    pub reward_update: RewardUpdate,
    /// Scan the pool in a shuffled order when exploiting, so ties do not
    /// always go to the same position.
    pub shuffle_ties: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.2,
            seed: 0,
            seed_policy: SeedPolicy::PerRun,
            reward_update: RewardUpdate::Delta,
            shuffle_ties: false,
        }
    }
}
