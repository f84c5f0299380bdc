//! Delayed actions driven by the event loop's clock.
//!
//! There is no cancellation: once scheduled, an action fires at its deadline
//! no matter what the user did in between.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Scheduler<A> {
    pending: Vec<(Instant, A)>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, action: A) {
        self.pending.push((now + delay, action));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(at, _)| *at).min()
    }

    /// Removes and returns every action due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<A> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = pending;
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, action)| action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_after_deadline() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::from_millis(1000), "login");

        assert!(scheduler.take_due(start + Duration::from_millis(999)).is_empty());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(
            scheduler.take_due(start + Duration::from_millis(1000)),
            vec!["login"]
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn returns_due_actions_in_deadline_order() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::from_millis(30), 3);
        scheduler.schedule(start, Duration::from_millis(10), 1);
        scheduler.schedule(start, Duration::from_millis(50), 5);
        scheduler.schedule(start, Duration::from_millis(20), 2);

        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_millis(10))
        );
        assert_eq!(
            scheduler.take_due(start + Duration::from_millis(30)),
            vec![1, 2, 3]
        );
        assert_eq!(scheduler.len(), 1);
    }
}
