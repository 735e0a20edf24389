//! Deterministic discrete-event queue with repeating tasks.
//!
//! Events are kept in a `BTreeMap` keyed by `(time, sequence)`.  The
//! sequence number is assigned at scheduling time, so events due at the same
//! instant run in the order they were scheduled.
//!
//! A repeating task is stored once and re-armed by [`EventQueue::pop`] each
//! time it fires, receiving a fresh sequence number at that moment.
//! [`EventQueue::cancel`] removes the task; an occurrence already in the map
//! is skipped when it comes due.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use mn_core::SimTime;

// ── EventKey ──────────────────────────────────────────────────────────────────

/// Position of one scheduled occurrence in the queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct EventKey {
    /// When the event is due.
    pub time:     SimTime,
    /// Scheduling order, FIFO among equal times.
    pub sequence: u64,
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
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

// ── TaskHandle ────────────────────────────────────────────────────────────────

/// Identifies a repeating task for [`EventQueue::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

struct Repeating<E> {
    period: Duration,
    event:  E,
}

enum Slot<E> {
    Once(E),
    Repeat(TaskHandle),
}

// ── EventQueue ────────────────────────────────────────────────────────────────

/// Single-threaded scheduler.  `E` is the caller's event type.
pub struct EventQueue<E> {
    now:       SimTime,
    next_seq:  u64,
    next_task: u64,
    events:    BTreeMap<EventKey, Slot<E>>,
    tasks:     HashMap<TaskHandle, Repeating<E>>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            now:       SimTime::ZERO,
            next_seq:  0,
            next_task: 0,
            events:    BTreeMap::new(),
            tasks:     HashMap::new(),
        }
    }

    /// Time of the most recently popped event.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `event` at `time`.  A time in the past is moved to `now`.
    pub fn schedule_at(&mut self, time: SimTime, event: E) -> EventKey {
        self.insert(time, Slot::Once(event))
    }

    /// Schedule `event` `delay` after `now`.
    pub fn schedule_after(&mut self, delay: Duration, event: E) -> EventKey {
        self.insert(self.now + delay, Slot::Once(event))
    }

    /// Remove a one-shot event that has not fired yet.
    pub fn unschedule(&mut self, key: EventKey) -> Option<E> {
        match self.events.remove(&key)? {
            Slot::Once(event) => Some(event),
            Slot::Repeat(handle) => {
                // Not a one-shot: put it back.
                self.events.insert(key, Slot::Repeat(handle));
                None
            }
        }
    }

    /// Number of pending occurrences, including cancelled repeats not yet
    /// skipped.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of live repeating tasks.
    #[inline]
    pub fn active_tasks(&self) -> usize {
        self.tasks.len()
    }

    fn insert(&mut self, time: SimTime, slot: Slot<E>) -> EventKey {
        let key = EventKey { time: time.max(self.now), sequence: self.next_seq };
        self.next_seq += 1;
        self.events.insert(key, slot);
        key
    }
}

impl<E: Clone> EventQueue<E> {
    /// Fire `event` at `first` and then every `period` until cancelled.
    ///
    /// # Panics
    /// Panics if `period` is zero.
    pub fn schedule_repeating(&mut self, first: SimTime, period: Duration, event: E) -> TaskHandle {
        assert!(!period.is_zero(), "repeating task with zero period");
        let handle = TaskHandle(self.next_task);
        self.next_task += 1;
        self.tasks.insert(handle, Repeating { period, event });
        self.insert(first, Slot::Repeat(handle));
        handle
    }

    /// Stop a repeating task.  Returns `false` if it was already cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.tasks.remove(&handle).is_some()
    }

    /// Remove and return the earliest event, advancing `now` to its time.
    pub fn pop(&mut self) -> Option<(SimTime, E)> {
        self.pop_until(SimTime::MAX)
    }

    /// Like [`pop`][Self::pop], but leaves events due after `limit` queued.
    pub fn pop_until(&mut self, limit: SimTime) -> Option<(SimTime, E)> {
        loop {
            let (&key, _) = self.events.first_key_value()?;
            if key.time > limit {
                return None;
            }
            let (key, slot) = self.events.pop_first()?;
            self.now = key.time;
            match slot {
                Slot::Once(event) => return Some((key.time, event)),
                Slot::Repeat(handle) => {
                    let Some(task) = self.tasks.get(&handle) else { continue };
                    let (period, event) = (task.period, task.event.clone());
                    self.insert(key.time + period, Slot::Repeat(handle));
                    return Some((key.time, event));
                }
            }
        }
    }
}
