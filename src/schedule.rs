//! One-shot callbacks on the game clock.
//!
//! Each event carries the token of whatever it belongs to (a boss encounter
//! id, a level number). The handler compares that token against the live
//! state before acting, so an event that outlives its encounter or level is
//! dropped instead of resurrecting it. Cancellation is never explicit.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::boss::BossPhase;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimedEvent {
    /// End of a timed boss phase (Entering, Shielded or Vulnerable).
    BossPhaseEnd { encounter: u64, phase: BossPhase },
    /// One radial shard burst during a Shielded window.
    ShardBurst { encounter: u64 },
    /// A lateral dash while the boss is Vulnerable.
    BossDash { encounter: u64 },
    /// A delayed mini-boss arrival on a boss level.
    MiniBossSpawn { level: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    due_ms: u64,
    seq: u64,
    event: TimedEvent,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-queue ordered by due time, then by insertion order.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&mut self, due_ms: u64, event: TimedEvent) {
        self.seq += 1;
        self.queue.push(Reverse(Entry {
            due_ms,
            seq: self.seq,
            event,
        }));
    }

    /// Next event due at or before `now_ms`, with its due time.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, TimedEvent)> {
        let Reverse(head) = self.queue.peek()?;
        if head.due_ms > now_ms {
            return None;
        }
        self.queue
            .pop()
            .map(|Reverse(entry)| (entry.due_ms, entry.event))
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(e)| e.due_ms)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn pending(&self) -> impl Iterator<Item = &TimedEvent> {
        self.queue.iter().map(|Reverse(e)| &e.event)
    }
}
