// src/model/demand.rs

use crate::error::SimError;
use crate::simulation::clock::SimTime;
use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::{Distribution, Exp};

/// How long to wait between two customer sales, in days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterArrival {
    /// Exactly one sale every `d` days.
    Fixed(SimTime),
    /// Uniformly distributed gap in `[low, high)`.
    Uniform { low: SimTime, high: SimTime },
    /// Poisson arrivals with `rate` sales per day.
    Exponential { rate: f64 },
}

impl InterArrival {
    /// One sale per day on average, spread uniformly over `[0, 1)` days.
    pub fn daily_uniform() -> Self {
        InterArrival::Uniform { low: 0.0, high: 1.0 }
    }

    /// Validates the parameters and builds a sampler for them.
    pub fn sampler(&self) -> Result<InterArrivalSampler, SimError> {
        match *self {
            InterArrival::Fixed(days) => {
                if !days.is_finite() || days <= 0.0 {
                    return Err(SimError::InvalidDistribution(format!(
                        "fixed gap must be positive and finite, got {days}"
                    )));
                }
                Ok(InterArrivalSampler::Fixed(days))
            }
            InterArrival::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(SimError::InvalidDistribution(format!(
                        "uniform range [{low}, {high}) is empty or unbounded"
                    )));
                }
                Ok(InterArrivalSampler::Uniform(Uniform::new(low, high)))
            }
            InterArrival::Exponential { rate } => {
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(SimError::InvalidDistribution(format!(
                        "exponential rate must be positive, got {rate}"
                    )));
                }
                let exp = Exp::new(rate).map_err(|e| {
                    SimError::InvalidDistribution(format!("exponential rate {rate}: {e:?}"))
                })?;
                Ok(InterArrivalSampler::Exponential(exp))
            }
        }
    }
}

/// A validated, ready-to-draw [`InterArrival`].
#[derive(Debug, Clone, Copy)]
pub enum InterArrivalSampler {
    Fixed(SimTime),
    Uniform(Uniform<f64>),
    Exponential(Exp<f64>),
}

impl InterArrivalSampler {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        match self {
            InterArrivalSampler::Fixed(days) => *days,
            InterArrivalSampler::Uniform(uniform) => uniform.sample(rng),
            InterArrivalSampler::Exponential(exp) => exp.sample(rng),
        }
    }
}
