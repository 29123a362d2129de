// src/simulation/clock.rs

//! Simulated clock and pending wake-ups, ordered deterministically.

use crate::error::SimError;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Simulated time, in days.
pub type SimTime = f64;

/// Key for ordering wake-ups in the queue.
///
/// Entries are ordered by:
/// 1. Fire time (earlier first)
/// 2. Sequence number (insertion order for equal times)
#[derive(Debug, Clone, Copy)]
pub struct EventKey {
    pub fire_time: SimTime,
    pub sequence: u64,
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.fire_time.total_cmp(&other.fire_time) {
            Ordering::Equal => {}
            ord => return ord,
        }
        self.sequence.cmp(&other.sequence)
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Entry<T> {
    key: EventKey,
    target: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The current simulated time plus every pending `(fire_time, sequence, target)`.
#[derive(Debug)]
pub struct Clock<T> {
    now: SimTime,
    sequence: u64,
    queue: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Default for Clock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clock<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            sequence: 0,
            queue: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Fire time of the earliest pending entry.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.queue.peek().map(|Reverse(entry)| entry.key.fire_time)
    }

    /// Queues `target` to wake up `delay` days from now.
    pub fn schedule(&mut self, delay: SimTime, target: T) -> Result<EventKey, SimError> {
        // `!(delay >= 0.0)` also catches NaN.
        if !(delay >= 0.0) {
            return Err(SimError::NegativeDelay { delay });
        }

        let key = EventKey {
            fire_time: self.now + delay,
            sequence: self.sequence,
        };
        self.sequence += 1;
        self.queue.push(Reverse(Entry { key, target }));
        Ok(key)
    }

    /// Pops the earliest entry if it fires no later than `until`, advancing
    /// `now` to its fire time.
    pub fn pop_due(&mut self, until: SimTime) -> Option<(EventKey, T)> {
        match self.peek_time() {
            Some(fire_time) if fire_time <= until => {}
            _ => return None,
        }

        let Reverse(entry) = self.queue.pop()?;
        self.now = entry.key.fire_time;
        Some((entry.key, entry.target))
    }

    /// Moves `now` forward to `until` once nothing else is due before it.
    pub fn advance_to(&mut self, until: SimTime) {
        if until > self.now {
            self.now = until;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_fire_time_wins() {
        let earlier = EventKey {
            fire_time: 1.0,
            sequence: 9,
        };
        let later = EventKey {
            fire_time: 2.0,
            sequence: 0,
        };
        assert!(earlier < later);
    }

    #[test]
    fn sequence_breaks_ties_at_same_time() {
        let first = EventKey {
            fire_time: 3.0,
            sequence: 1,
        };
        let second = EventKey {
            fire_time: 3.0,
            sequence: 2,
        };
        assert!(first < second, "insertion order should break ties");
    }

    #[test]
    fn pops_in_time_then_insertion_order() {
        let mut clock = Clock::new();
        clock.schedule(2.0, "c").unwrap();
        clock.schedule(1.0, "a").unwrap();
        clock.schedule(1.0, "b").unwrap();

        let order: Vec<&str> = std::iter::from_fn(|| clock.pop_due(10.0))
            .map(|(_, target)| target)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(clock.now(), 2.0);
    }

    #[test]
    fn rejects_negative_and_nan_delays() {
        let mut clock: Clock<()> = Clock::new();
        assert_eq!(
            clock.schedule(-0.5, ()),
            Err(SimError::NegativeDelay { delay: -0.5 })
        );
        assert!(matches!(
            clock.schedule(f64::NAN, ()),
            Err(SimError::NegativeDelay { .. })
        ));
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn entries_past_the_bound_stay_queued() {
        let mut clock = Clock::new();
        clock.schedule(5.0, 1).unwrap();

        assert!(clock.pop_due(4.0).is_none());
        clock.advance_to(4.0);
        assert_eq!(clock.now(), 4.0);
        assert_eq!(clock.pending(), 1);

        let (key, target) = clock.pop_due(5.0).unwrap();
        assert_eq!((key.fire_time, target), (5.0, 1));
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut clock: Clock<()> = Clock::new();
        clock.advance_to(3.0);
        clock.advance_to(1.0);
        assert_eq!(clock.now(), 3.0);
    }
}
