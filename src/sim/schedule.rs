//! Single-flight one-shot tick scheduling
//!
//! The game loop is not a free-running clock: every tick schedules at most one
//! successor. The scheduler holds at most one pending [`TickHandle`], and
//! scheduling always replaces (cancels) whatever was pending.

/// A pending tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle {
    /// Timestamp at or after which the tick may run
    pub due_at_ms: u64,
    /// Bumped on every schedule; distinguishes re-armed ticks
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    pending: Option<TickHandle>,
    generation: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the next tick `delay_ms` after `now_ms`, dropping any pending one
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) -> TickHandle {
        self.cancel();
        self.generation += 1;
        let handle = TickHandle {
            due_at_ms: now_ms.saturating_add(delay_ms),
            generation: self.generation,
        };
        self.pending = Some(handle);
        handle
    }

    /// Drop the pending tick. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the pending tick if it is due
    pub fn take_due(&mut self, now_ms: u64) -> Option<TickHandle> {
        match self.pending {
            Some(handle) if handle.due_at_ms <= now_ms => self.pending.take(),
            _ => None,
        }
    }
}
