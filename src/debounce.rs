use std::time::{Duration, Instant};

/// Collapses bursts of triggers into a single delayed action.
///
/// Scheduling replaces whatever was pending: the previous task is cancelled
/// and the quiescence window restarts from `now`. Time is supplied by the
/// caller, which keeps the behaviour deterministic under test.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Cancel the pending task, if any, and schedule `task` to fire one
    /// window after `now`. Returns the cancelled task.
    pub fn schedule(&mut self, task: T, now: Instant) -> Option<T> {
        self.pending
            .replace((now + self.window, task))
            .map(|(_, old)| old)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, t)| t)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending task once its deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if *at <= now => self.pending.take().map(|(_, t)| t),
            _ => None,
        }
    }
}
