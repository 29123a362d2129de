// src/io/reporting.rs

use crate::simulation::history::AvailabilityHistory;
use serde::Serialize;
use std::io::Write;

/// One row of the availability chart.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityRecord {
    pub day: u32,
    pub available: u32,
    pub target: u32,
}

/// One row of the reward-over-time chart.
#[derive(Debug, Clone, Serialize)]
pub struct RewardRecord {
    pub iteration: usize,
    pub reward: f64,
}

/// Writes the availability history as CSV, one row per day, with the target
/// repeated on every row so a plotting tool can draw the threshold line.
///
/// # Arguments
/// * `writer` - Where to send the rows (stdout, a buffer, a file...).
/// * `history` - The availability recorded by a finished simulation.
/// * `target` - The availability the optimizer was aiming for.
pub fn write_availability_csv<W: Write>(
    writer: W,
    history: &AvailabilityHistory,
    target: u32,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    for (day, available) in history.iter() {
        wtr.serialize(AvailabilityRecord {
            day,
            available,
            target,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the optimizer's reward history as CSV, one row per iteration.
pub fn write_reward_csv<W: Write>(writer: W, rewards: &[f64]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    for (iteration, reward) in rewards.iter().enumerate() {
        wtr.serialize(RewardRecord {
            iteration,
            reward: *reward,
        })?;
    }

    wtr.flush()?;
    Ok(())
}
