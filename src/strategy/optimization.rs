// src/strategy/optimization.rs

//! Epsilon-greedy search over purchase-order parameters.
//!
//! Each iteration nudges one field of one purchase order by ±1, re-runs the
//! shelf simulation from scratch, and scores the run. The score is credited
//! to the action that caused the nudge, biasing later choices towards moves
//! that paid off.

use crate::error::OptimizerError;
use crate::model::purchase_order::{OrderField, PurchaseOrder};
use crate::simulation::config::{OptimizerConfig, RewardUpdate, SeedPolicy, SimulationConfig};
use crate::simulation::engine::Simulation;
use crate::simulation::history::AvailabilityHistory;
use crate::strategy::traits::{RewardContext, RewardFunction};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Which way an action moves its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Decrease,
    Increase,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Decrease, Direction::Increase];

    pub fn step(self) -> i64 {
        match self {
            Direction::Decrease => -1,
            Direction::Increase => 1,
        }
    }
}

/// A ±1 nudge to one field of one purchase order, with the reward it is
/// currently believed to earn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    /// Index of the target order in the optimizer's order list.
    pub order: usize,
    pub field: OrderField,
    pub direction: Direction,
    pub estimated_reward: f64,
}

impl Action {
    pub fn new(order: usize, field: OrderField, direction: Direction) -> Self {
        Self {
            order,
            field,
            direction,
            estimated_reward: 0.0,
        }
    }

    /// The move this action makes, ignoring its estimate.
    pub fn target(&self) -> (usize, OrderField, Direction) {
        (self.order, self.field, self.direction)
    }

    /// Applies the nudge. Fields never drop below 0.
    pub fn apply(&self, orders: &mut [PurchaseOrder]) -> Result<(), OptimizerError> {
        let order = orders
            .get_mut(self.order)
            .ok_or(OptimizerError::UnknownOrder(self.order))?;
        order.nudge(self.field, self.direction.step());
        Ok(())
    }
}

/// Every order × field × direction, in that nesting order: `4 * order_count`
/// actions.
pub fn build_action_pool(order_count: usize) -> Vec<Action> {
    let mut pool = Vec::with_capacity(order_count * 4);
    for order in 0..order_count {
        for field in OrderField::ALL {
            for direction in Direction::ALL {
                pool.push(Action::new(order, field, direction));
            }
        }
    }
    pool
}

/// What one optimization iteration did and how it scored.
#[derive(Debug, Clone)]
pub struct IterationOutcome {
    pub iteration: u64,
    pub action: Action,
    pub reward: f64,
    pub simulation_seed: u64,
    pub history: AvailabilityHistory,
}

/// An epsilon-greedy agent that owns the purchase orders it tunes.
///
/// Orders are only written by [`Action::apply`] between runs. Each run takes
/// its own copy when the [`Simulation`] is built.
pub struct Optimizer {
    config: OptimizerConfig,
    orders: Vec<PurchaseOrder>,
    actions: Vec<Action>,
    chosen: Option<usize>,
    rewards: Vec<f64>,
    rng: ChaCha8Rng,
    iteration: u64,
}

impl Optimizer {
    pub fn new(
        config: OptimizerConfig,
        orders: Vec<PurchaseOrder>,
    ) -> Result<Self, OptimizerError> {
        if !(0.0..=1.0).contains(&config.epsilon) {
            return Err(OptimizerError::InvalidEpsilon(config.epsilon));
        }

        let actions = build_action_pool(orders.len());
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            orders,
            actions,
            chosen: None,
            rewards: Vec::new(),
            rng,
            iteration: 0,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    pub fn orders(&self) -> &[PurchaseOrder] {
        &self.orders
    }

    pub fn into_orders(self) -> Vec<PurchaseOrder> {
        self.orders
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Every reward received so far, oldest first.
    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    pub fn chosen_action(&self) -> Option<&Action> {
        self.chosen.map(|index| &self.actions[index])
    }

    /// Number of completed [`step`](Self::step) calls.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Explores a random action with probability `epsilon`, otherwise exploits
    /// the action with the highest estimate. Ties go to the earliest action in
    /// scan order.
    pub fn choose_action(&mut self) -> Result<Action, OptimizerError> {
        if self.actions.is_empty() {
            return Err(OptimizerError::EmptyActionPool);
        }

        let index = if self.rng.gen::<f64>() < self.config.epsilon {
            self.rng.gen_range(0..self.actions.len())
        } else {
            self.best_action()
        };

        self.chosen = Some(index);
        Ok(self.actions[index])
    }

    fn best_action(&mut self) -> usize {
        let mut scan: Vec<usize> = (0..self.actions.len()).collect();
        if self.config.shuffle_ties {
            scan.shuffle(&mut self.rng);
        }

        let mut best = scan[0];
        for &index in &scan[1..] {
            if self.actions[index].estimated_reward > self.actions[best].estimated_reward {
                best = index;
            }
        }
        best
    }

    /// Applies the most recently chosen action to the orders.
    pub fn apply_chosen(&mut self) -> Result<(), OptimizerError> {
        let index = self.chosen.ok_or(OptimizerError::NoActionChosen)?;
        self.actions[index].apply(&mut self.orders)
    }

    /// Credits `reward` to the most recently chosen action and appends it to
    /// the reward history.
    pub fn apply_reward(&mut self, reward: f64) -> Result<(), OptimizerError> {
        let index = self.chosen.ok_or(OptimizerError::NoActionChosen)?;

        let estimate = match self.config.reward_update {
            RewardUpdate::Absolute => reward,
            RewardUpdate::Delta => self.rewards.last().map_or(0.0, |previous| reward - previous),
        };
        self.actions[index].estimated_reward = estimate;
        self.rewards.push(reward);
        Ok(())
    }

    fn next_simulation_seed(&mut self) -> u64 {
        match self.config.seed_policy {
            SeedPolicy::PerRun => {
                let seed = self.config.seed.wrapping_add(self.iteration);
                self.rng = ChaCha8Rng::seed_from_u64(seed);
                seed
            }
            SeedPolicy::OncePerOptimizer => self.rng.gen(),
        }
    }

    /// One full iteration: choose, apply, simulate, score, credit.
    ///
    /// A poor reward is not rolled back; the mutated orders stay as they are
    /// and only the chosen action's estimate reflects the outcome. If the
    /// simulation or the reward fails, the orders are left untouched and the
    /// iteration does not count.
    pub fn step<R>(
        &mut self,
        sim_config: &SimulationConfig,
        reward_fn: &R,
    ) -> Result<IterationOutcome, OptimizerError>
    where
        R: RewardFunction + ?Sized,
    {
        let iteration = self.iteration;
        let simulation_seed = self.next_simulation_seed();

        let action = self.choose_action()?;
        let mut candidate = self.orders.clone();
        action.apply(&mut candidate)?;

        let mut simulation = Simulation::new(&candidate, sim_config.clone(), simulation_seed)?;
        simulation.run_to_end()?;
        let history = simulation.into_history();

        let reward = reward_fn.reward(&RewardContext::new(&history, &candidate))?;
        self.orders = candidate;
        self.apply_reward(reward)?;
        self.iteration += 1;

        debug!(
            iteration,
            order = action.order,
            field = ?action.field,
            direction = ?action.direction,
            reward,
            "optimizer iteration"
        );

        let action = self.chosen_action().copied().unwrap_or(action);
        Ok(IterationOutcome {
            iteration,
            action,
            reward,
            simulation_seed,
            history,
        })
    }

    /// Runs `iterations` steps and returns the last one, if any ran.
    pub fn run<R>(
        &mut self,
        sim_config: &SimulationConfig,
        reward_fn: &R,
        iterations: u64,
    ) -> Result<Option<IterationOutcome>, OptimizerError>
    where
        R: RewardFunction + ?Sized,
    {
        let mut last = None;
        for _ in 0..iterations {
            last = Some(self.step(sim_config, reward_fn)?);
        }

        if let Some(outcome) = &last {
            let best = self.rewards.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            info!(
                iterations,
                final_reward = outcome.reward,
                best_reward = best,
                epsilon = self.config.epsilon,
                "optimization finished"
            );
        }
        Ok(last)
    }
}
