use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::catalog::errors::RefreshError;

pub(crate) type RefreshResult = Result<(), RefreshError>;

#[derive(Debug, PartialEq)]
pub(crate) enum GateOutcome {
    /// The caller ran the cycle.
    Performed(RefreshResult),
    /// Another caller completed a cycle while this caller was waiting; its outcome is shared.
    Shared(RefreshResult),
    /// The cycle was no longer needed once the caller got through the gate.
    Skipped,
}

struct CompletedCycle {
    sequence: u64,
    outcome: RefreshResult,
}

/// RefreshGate lets at most one refresh cycle run at a time.
///
/// A caller that arrives while a cycle is in flight blocks on the gate. Once through, it compares the number of
/// completed cycles with the number it observed on arrival: if a cycle completed in the meantime, the caller takes
/// that cycle's outcome instead of running another one.
pub(crate) struct RefreshGate {
    last_cycle: Mutex<CompletedCycle>,
    completed: AtomicU64,
}

impl RefreshGate {
    pub(crate) fn new() -> Self {
        RefreshGate {
            last_cycle: Mutex::new(CompletedCycle { sequence: 0, outcome: Ok(()) }),
            completed: AtomicU64::new(0),
        }
    }

    pub(crate) fn run<Needed, Cycle>(&self, still_needed: Needed, cycle: Cycle) -> GateOutcome
        where Needed: FnOnce() -> bool,
              Cycle: FnOnce() -> RefreshResult {
        let observed = self.completed.load(Ordering::Acquire);
        let mut last_cycle = self.last_cycle.lock();

        if last_cycle.sequence != observed {
            return GateOutcome::Shared(last_cycle.outcome.clone());
        }
        if !still_needed() {
            return GateOutcome::Skipped;
        }

        let outcome = cycle();
        last_cycle.sequence += 1;
        last_cycle.outcome = outcome.clone();
        self.completed.store(last_cycle.sequence, Ordering::Release);

        GateOutcome::Performed(outcome)
    }

    #[cfg(test)]
    pub(crate) fn completed_cycles(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }
}
