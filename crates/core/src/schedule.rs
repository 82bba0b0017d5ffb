//! Virtual-clock timers. Nothing runs on its own: the owner calls
//! [`Scheduler::advance`] with elapsed milliseconds and applies whatever
//! comes due.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    payload: T,
    every: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: u64,
    next_seq: u64,
    next_id: u64,
    queue: BinaryHeap<Reverse<(u64, u64, TimerId)>>,
    timers: HashMap<TimerId, Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            next_id: 0,
            queue: BinaryHeap::new(),
            timers: HashMap::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of live timers, periodic ones included.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn after(&mut self, delay_ms: u64, payload: T) -> TimerId {
        self.insert(delay_ms, payload, None)
    }

    /// Periodic timer; the first firing happens one interval from now.
    pub fn every(&mut self, interval_ms: u64, payload: T) -> TimerId {
        self.insert(interval_ms, payload, Some(interval_ms.max(1)))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Moves the clock forward and returns due payloads ordered by due time,
    /// then by scheduling order.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<T> {
        let deadline = self.deadline(elapsed_ms);
        let mut fired = Vec::new();
        while let Some(payload) = self.poll_until(deadline) {
            fired.push(payload);
        }
        self.settle(deadline);
        fired
    }

    pub fn deadline(&self, elapsed_ms: u64) -> u64 {
        self.now.saturating_add(elapsed_ms)
    }

    /// Pops the next payload due at or before `deadline`, moving the clock to
    /// its due time so that timers scheduled while handling it are relative
    /// to the moment it fired.
    pub fn poll_until(&mut self, deadline: u64) -> Option<T> {
        while let Some(Reverse((due, _, id))) = self.queue.peek().copied() {
            if due > deadline {
                return None;
            }
            self.queue.pop();
            let Some(timer) = self.timers.get(&id) else {
                continue;
            };
            self.now = self.now.max(due);
            let payload = timer.payload.clone();
            match timer.every {
                Some(interval) => {
                    let seq = self.bump_seq();
                    self.queue.push(Reverse((due + interval, seq, id)));
                }
                None => {
                    self.timers.remove(&id);
                }
            }
            return Some(payload);
        }
        None
    }

    pub fn settle(&mut self, deadline: u64) {
        self.now = self.now.max(deadline);
    }

    fn insert(&mut self, delay_ms: u64, payload: T, every: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.queue
            .push(Reverse((self.now.saturating_add(delay_ms), seq, id)));
        self.timers.insert(id, Timer { payload, every });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.after(300, "c");
        scheduler.after(100, "a");
        scheduler.after(100, "b");
        assert!(scheduler.advance(99).is_empty());
        assert_eq!(scheduler.advance(1), vec!["a", "b"]);
        assert_eq!(scheduler.advance(500), vec!["c"]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn periodic_timers_repeat_until_cancelled() {
        let mut scheduler = Scheduler::new();
        let tick = scheduler.every(1000, "tick");
        scheduler.after(1500, "once");
        assert_eq!(scheduler.advance(3000), vec!["tick", "once", "tick", "tick"]);
        assert!(scheduler.cancel(tick));
        assert!(!scheduler.cancel(tick));
        assert!(scheduler.advance(5000).is_empty());
    }

    #[test]
    fn timers_scheduled_later_count_from_current_clock() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.advance(250).is_empty());
        scheduler.after(100, 1);
        assert_eq!(scheduler.now(), 250);
        assert!(scheduler.advance(50).is_empty());
        assert_eq!(scheduler.advance(50), vec![1]);
    }
}
