// src/error.rs

use crate::simulation::clock::SimTime;

/// Failures raised while building or running a single simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// A process asked to be woken up in the past (or with a NaN delay).
    #[error("negative delay requested: {delay}")]
    NegativeDelay { delay: SimTime },

    #[error("cannot run until {until}: clock is already at {now}")]
    UntilInPast { until: SimTime, now: SimTime },

    /// A metric was asked to reduce a history with no recorded days.
    #[error("metric requested over an empty availability history")]
    EmptyHistory,

    #[error("availability history expected day {expected}, got day {got}")]
    NonContiguousHistory { expected: u32, got: u32 },

    #[error("invalid sales distribution: {0}")]
    InvalidDistribution(String),

    /// A periodic process was configured with a zero, negative or non-finite period.
    #[error("period must be positive and finite, got {0}")]
    InvalidInterval(SimTime),
}

/// Failures raised by the epsilon-greedy optimizer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimizerError {
    #[error("epsilon must lie within [0, 1], got {0}")]
    InvalidEpsilon(f64),

    #[error("action pool is empty: there are no purchase orders to tune")]
    EmptyActionPool,

    #[error("no action has been chosen yet")]
    NoActionChosen,

    #[error("action targets unknown purchase order #{0}")]
    UnknownOrder(usize),

    #[error(transparent)]
    Simulation(#[from] SimError),
}
