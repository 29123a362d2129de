//! Perishable inventory simulation with an epsilon-greedy purchase planner.
//!
//! A [`Simulation`](simulation::engine::Simulation) ages, sells, clears out
//! and restocks a shelf over simulated days, recording how many items are
//! available each day. An [`Optimizer`](strategy::optimization::Optimizer)
//! nudges the purchase orders one step at a time and re-runs the simulation
//! to learn which nudges keep availability on target.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::{OptimizerError, SimError};
