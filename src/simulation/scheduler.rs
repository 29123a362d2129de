// src/simulation/scheduler.rs

//! Cooperative, single-threaded process scheduling on top of [`Clock`].

use crate::error::SimError;
use crate::simulation::clock::{Clock, SimTime};
use tracing::{debug, trace, warn};

/// Identifies a registered process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(usize);

/// What a process asks for when it hands control back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Yield {
    /// Suspend and resume after this many days.
    Timeout(SimTime),
    /// The process is done and will never be resumed again.
    Finish,
}

/// A resumable unit of behaviour operating on shared state `S`.
///
/// Each call to `resume` runs the process from its saved position up to its
/// next suspension point. The process keeps whatever state it needs to know
/// where it left off.
pub trait Process<S> {
    fn name(&self) -> &str;

    fn resume(&mut self, now: SimTime, state: &mut S) -> Result<Yield, SimError>;
}

/// Registers processes and resumes them in `(fire_time, sequence)` order.
pub struct Scheduler<S> {
    clock: Clock<ProcessId>,
    processes: Vec<Option<Box<dyn Process<S>>>>,
}

impl<S> Default for Scheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Scheduler<S> {
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
            processes: Vec::new(),
        }
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Number of processes that have not finished yet.
    pub fn live_processes(&self) -> usize {
        self.processes.iter().filter(|p| p.is_some()).count()
    }

    /// Adds a process; its first step runs at the current time, after every
    /// process registered before it.
    pub fn register(&mut self, process: Box<dyn Process<S>>) -> Result<ProcessId, SimError> {
        let id = ProcessId(self.processes.len());
        debug!(process = process.name(), at = self.clock.now(), "registering process");
        self.processes.push(Some(process));
        self.clock.schedule(0.0, id)?;
        Ok(id)
    }

    /// Resumes due processes until the queue is empty or the next wake-up lies
    /// beyond `until`. Calling it again with a later bound carries on from
    /// where the previous call stopped.
    pub fn run(&mut self, until: SimTime, state: &mut S) -> Result<(), SimError> {
        let now = self.clock.now();
        if until < now {
            return Err(SimError::UntilInPast { until, now });
        }

        while let Some((key, id)) = self.clock.pop_due(until) {
            let Some(process) = self.processes[id.0].as_mut() else {
                continue;
            };
            trace!(
                process = process.name(),
                at = key.fire_time,
                sequence = key.sequence,
                "resuming"
            );

            match process.resume(key.fire_time, state)? {
                Yield::Timeout(delay) => {
                    if let Err(err) = self.clock.schedule(delay, id) {
                        warn!(process = process.name(), delay, "aborting run: {err}");
                        return Err(err);
                    }
                }
                Yield::Finish => {
                    debug!(process = process.name(), at = key.fire_time, "process finished");
                    self.processes[id.0] = None;
                }
            }
        }

        self.clock.advance_to(until);
        Ok(())
    }
}
