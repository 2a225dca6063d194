//! Deferred-callback scheduling.
//!
//! Controllers never touch wall-clock timers directly; they ask a
//! [`Scheduler`] for a callback after a delay and hold the returned
//! [`CancelGuard`] for as long as the callback may still matter.
//!
//! [`TickScheduler`] is the single implementation: a timer queue driven by
//! explicit clock advances. The frame loop advances it by real frame deltas;
//! tests advance it by exact amounts.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::guard::CancelGuard;

/// Deferred-callback scheduler with cancellation.
pub trait Scheduler {
    /// Current time on this scheduler's clock.
    fn now(&self) -> Duration;

    /// Run `task` once after `delay`.
    fn schedule_once(&self, delay: Duration, task: Box<dyn FnOnce()>) -> CancelGuard;

    /// Run `task` every `interval` until the guard is dropped.
    fn schedule_repeating(&self, interval: Duration, task: Box<dyn FnMut()>) -> CancelGuard;
}

/// Shared handle to a scheduler, as held by controllers.
pub type SharedScheduler = Rc<dyn Scheduler>;

/// Repeating timers never fire more often than this, so a single advance
/// always terminates.
const MIN_REPEAT_INTERVAL: Duration = Duration::from_millis(1);

type TimerId = u64;
type QueueKey = (Duration, u64);

enum Task {
    Once(Box<dyn FnOnce()>),
    Repeating {
        interval: Duration,
        run: Box<dyn FnMut()>,
    },
}

struct Slot {
    key: QueueKey,
    /// `None` while the task is running.
    task: Option<Task>,
}

#[derive(Default)]
struct Queue {
    now: Duration,
    next_seq: u64,
    order: BTreeMap<QueueKey, TimerId>,
    slots: HashMap<TimerId, Slot>,
}

impl Queue {
    fn next_key(&mut self, due: Duration) -> QueueKey {
        let seq = self.next_seq;
        self.next_seq += 1;
        (due, seq)
    }

    fn insert(&mut self, delay: Duration, task: Task) -> TimerId {
        let due = self.now.saturating_add(delay);
        let key = self.next_key(due);
        let id = key.1;
        self.order.insert(key, id);
        self.slots.insert(
            id,
            Slot {
                key,
                task: Some(task),
            },
        );
        id
    }

    fn remove(&mut self, id: TimerId) -> Option<Slot> {
        let slot = self.slots.remove(&id)?;
        self.order.remove(&slot.key);
        Some(slot)
    }
}

/// Timer queue advanced by an explicit clock.
///
/// Due tasks run in `(due time, scheduling order)` order, one at a time, with
/// no internal borrow held, so a task may schedule or cancel timers
/// (including its own). A repeating task is re-queued only after its run
/// returns and only if it was not cancelled meanwhile.
#[derive(Clone, Default)]
pub struct TickScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl TickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers that can still fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().slots.len()
    }

    /// Advance the clock by `delta`, running every task that falls due.
    pub fn advance(&self, delta: Duration) {
        let target = self.queue.borrow().now.saturating_add(delta);
        self.run_until(target);
    }

    /// Run every task due at or before `target`, then set the clock to it.
    pub fn run_until(&self, target: Duration) {
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                match queue.order.first_key_value() {
                    Some((&key, &id)) if key.0 <= target => {
                        queue.order.remove(&key);
                        queue.now = queue.now.max(key.0);
                        Some((key, id))
                    }
                    _ => None,
                }
            };
            let Some((key, id)) = next else { break };
            self.fire(key, id);
        }

        let mut queue = self.queue.borrow_mut();
        queue.now = queue.now.max(target);
    }

    fn fire(&self, key: QueueKey, id: TimerId) {
        let task = {
            let mut queue = self.queue.borrow_mut();
            match queue.slots.get_mut(&id).and_then(|slot| slot.task.take()) {
                Some(Task::Once(run)) => {
                    queue.slots.remove(&id);
                    Some(Task::Once(run))
                }
                other => other,
            }
        };

        match task {
            Some(Task::Once(run)) => run(),
            Some(Task::Repeating { interval, mut run }) => {
                run();
                let mut queue = self.queue.borrow_mut();
                if queue.slots.contains_key(&id) {
                    let next = queue.next_key(key.0.saturating_add(interval));
                    queue.order.insert(next, id);
                    if let Some(slot) = queue.slots.get_mut(&id) {
                        slot.key = next;
                        slot.task = Some(Task::Repeating { interval, run });
                    }
                }
            }
            None => {}
        }
    }

    fn guard_for(&self, id: TimerId) -> CancelGuard {
        let queue: Weak<RefCell<Queue>> = Rc::downgrade(&self.queue);
        CancelGuard::new(move || {
            let Some(queue) = queue.upgrade() else { return };
            // Drop the task after the borrow ends: its captures may release
            // further guards.
            let removed = queue.borrow_mut().remove(id);
            drop(removed);
        })
    }
}

impl Scheduler for TickScheduler {
    fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    fn schedule_once(&self, delay: Duration, task: Box<dyn FnOnce()>) -> CancelGuard {
        let id = self.queue.borrow_mut().insert(delay, Task::Once(task));
        self.guard_for(id)
    }

    fn schedule_repeating(&self, interval: Duration, task: Box<dyn FnMut()>) -> CancelGuard {
        let interval = interval.max(MIN_REPEAT_INTERVAL);
        let id = self
            .queue
            .borrow_mut()
            .insert(interval, Task::Repeating { interval, run: task });
        self.guard_for(id)
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.queue.borrow();
        f.debug_struct("TickScheduler")
            .field("now", &queue.now)
            .field("pending", &queue.slots.len())
            .finish()
    }
}
