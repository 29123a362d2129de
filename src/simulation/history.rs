// src/simulation/history.rs

use crate::error::SimError;
use std::collections::BTreeMap;

/// Items available per simulated day, one entry per day with no gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityHistory {
    days: BTreeMap<u32, u32>,
}

impl AvailabilityHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the count for `day`, which must directly follow the last
    /// recorded day. The first record may start on any day.
    pub fn record(&mut self, day: u32, available: u32) -> Result<(), SimError> {
        if let Some(last) = self.last_day() {
            let expected = last.saturating_add(1);
            if day != expected {
                return Err(SimError::NonContiguousHistory { expected, got: day });
            }
        }
        self.days.insert(day, available);
        Ok(())
    }

    pub fn get(&self, day: u32) -> Option<u32> {
        self.days.get(&day).copied()
    }

    pub fn first_day(&self) -> Option<u32> {
        self.days.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<u32> {
        self.days.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// `(day, available)` pairs in increasing day order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.days.iter().map(|(day, available)| (*day, *available))
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.days.values().copied()
    }
}
