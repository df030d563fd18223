use core::fmt;

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::ring::{DataDebugger, Ring};
use crate::trace::{debug, trace};
use crate::{Queue, QueueError};

/// How [`BoundedQueue::resize`] treats a new capacity smaller than the number of currently queued items.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ShrinkPolicy {
    /// Accept the new capacity and keep every item. The queue then stores more items than its [capacity](BoundedQueue::capacity), and rejects enqueueing until dequeueing has brought the number of items below the capacity.
    #[default]
    Retain,
    /// Reject the resize with [`QueueError::NewCapacityTooSmall`], leaving the queue unchanged.
    Reject,
}

/// Everything guarded by the mutex of a [`BoundedQueue`].
struct State<T> {
    ring: Ring<T>,
    /// The declared capacity. The ring may have more slots than this after shrinking with [`ShrinkPolicy::Retain`], never fewer.
    capacity: usize,
    closed: bool,
}

impl<T> State<T> {
    fn is_full(&self) -> bool {
        self.ring.len() >= self.capacity
    }

    /// Must only be called if `!self.is_full()`.
    fn push(&mut self, item: T) {
        let rejected = self.ring.enqueue(item);
        debug_assert!(
            rejected.is_none(),
            "the ring never has fewer slots than the declared capacity"
        );
    }
}

/// A thread-safe first-in-first-out queue holding up to [`capacity`](BoundedQueue::capacity) items, where the capacity can be changed at any time.
///
/// All methods take `&self`; share the queue between threads by reference (for example via [`std::thread::scope`]) or by wrapping it in an [`Arc`](std::sync::Arc). Every method holds a single mutex for its whole duration (blocked callers release it while waiting), so all operations are atomic with respect to each other.
///
/// The `try_` methods never block. [`enqueue`](BoundedQueue::enqueue) blocks while the queue is full, [`dequeue`](BoundedQueue::dequeue) blocks while the queue is empty. Either returns [`QueueError::Closed`] when the queue gets [closed](BoundedQueue::close) while waiting (a blocked dequeue only does so if no items remain).
///
/// ```
/// use std::thread;
///
/// use resizable_fifo::{BoundedQueue, QueueError};
///
/// let queue = BoundedQueue::new(1).unwrap();
///
/// thread::scope(|s| {
///     let consumer = s.spawn(|| {
///         let mut received = vec![];
///         while let Ok(item) = queue.dequeue() {
///             received.push(item);
///         }
///         received
///     });
///
///     for item in 0..10 {
///         queue.enqueue(item).unwrap();
///     }
///     queue.close().unwrap();
///
///     assert_eq!(consumer.join().unwrap(), (0..10).collect::<Vec<_>>());
/// });
///
/// assert_eq!(queue.try_dequeue(), Err(QueueError::Closed));
/// ```
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    /// Notified on every change of the state that could let a blocked caller proceed.
    changed: Condvar,
    shrink_policy: ShrinkPolicy,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue of the given capacity, which resizes according to [`ShrinkPolicy::Retain`].
    ///
    /// Returns [`QueueError::CapacityNotPositive`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        Self::with_shrink_policy(capacity, ShrinkPolicy::default())
    }

    /// Creates an empty queue of the given capacity, which handles resizing below its current length according to the given policy.
    ///
    /// Returns [`QueueError::CapacityNotPositive`] if `capacity` is zero.
    pub fn with_shrink_policy(
        capacity: usize,
        shrink_policy: ShrinkPolicy,
    ) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::CapacityNotPositive);
        }

        Ok(BoundedQueue {
            state: Mutex::new(State {
                ring: Ring::new(capacity),
                capacity,
                closed: false,
            }),
            changed: Condvar::new(),
            shrink_policy,
        })
    }

    /// Returns the number of items in the queue.
    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    /// Returns whether the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the queue holds at least as many items as its capacity.
    pub fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    /// Returns the current capacity of the queue.
    ///
    /// After shrinking with [`ShrinkPolicy::Retain`], this can be less than [`len`](BoundedQueue::len).
    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    /// Returns whether the queue has been [closed](BoundedQueue::close).
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Returns the policy for resizing below the current length.
    pub fn shrink_policy(&self) -> ShrinkPolicy {
        self.shrink_policy
    }

    /// Appends an item to the back of the queue if there is room for it, without blocking.
    ///
    /// Returns [`QueueError::Closed`] if the queue has been closed, or [`QueueError::Full`] if the queue is full.
    pub fn try_enqueue(&self, item: T) -> Result<(), QueueError> {
        let mut state = self.lock();

        if state.closed {
            return Err(QueueError::Closed);
        }

        if state.is_full() {
            return Err(QueueError::Full);
        }

        state.push(item);
        drop(state);
        self.changed.notify_all();

        Ok(())
    }

    /// Appends an item to the back of the queue, blocking the calling thread while the queue is full.
    ///
    /// Returns [`QueueError::Closed`] without enqueueing if the queue is closed, or gets closed while waiting.
    pub fn enqueue(&self, item: T) -> Result<(), QueueError> {
        let mut state = self.lock();

        while state.is_full() && !state.closed {
            trace!(
                len = state.ring.len(),
                capacity = state.capacity,
                "waiting for room to enqueue"
            );
            state = self.wait(state);
        }

        if state.closed {
            return Err(QueueError::Closed);
        }

        state.push(item);
        drop(state);
        self.changed.notify_all();

        Ok(())
    }

    /// Removes and returns the item at the front of the queue, without blocking.
    ///
    /// Returns [`QueueError::Empty`] if the queue is empty, or [`QueueError::Closed`] if the queue is empty and closed.
    pub fn try_dequeue(&self) -> Result<T, QueueError> {
        let mut state = self.lock();

        match state.ring.dequeue() {
            Some(item) => {
                drop(state);
                self.changed.notify_all();
                Ok(item)
            }
            None if state.closed => Err(QueueError::Closed),
            None => Err(QueueError::Empty),
        }
    }

    /// Removes and returns the item at the front of the queue, blocking the calling thread while the queue is empty.
    ///
    /// Items remaining in a closed queue are still returned. Returns [`QueueError::Closed`] if the queue is empty and closed, or gets closed while waiting.
    pub fn dequeue(&self) -> Result<T, QueueError> {
        let mut state = self.lock();

        loop {
            if let Some(item) = state.ring.dequeue() {
                drop(state);
                self.changed.notify_all();
                return Ok(item);
            }

            if state.closed {
                return Err(QueueError::Closed);
            }

            trace!("waiting for an item to dequeue");
            state = self.wait(state);
        }
    }

    /// Changes the capacity of the queue, keeping all queued items in order.
    ///
    /// Resizing to the current capacity does nothing. Otherwise, returns [`QueueError::CapacityNotPositive`] if `new_capacity` is zero, or [`QueueError::Closed`] if the queue has been closed. If `new_capacity` is less than the current length, the [`ShrinkPolicy`] of the queue decides: [`Retain`](ShrinkPolicy::Retain) keeps all items and resizes anyway, [`Reject`](ShrinkPolicy::Reject) returns [`QueueError::NewCapacityTooSmall`]. On error, the queue is left unchanged.
    ///
    /// Takes time linear in the number of queued items. Wakes up all blocked callers, so that enqueueing can continue after growing the queue.
    pub fn resize(&self, new_capacity: usize) -> Result<(), QueueError> {
        let mut state = self.lock();

        if new_capacity == state.capacity {
            return Ok(());
        }

        if new_capacity == 0 {
            return Err(QueueError::CapacityNotPositive);
        }

        if state.closed {
            return Err(QueueError::Closed);
        }

        let len = state.ring.len();
        if new_capacity < len && self.shrink_policy == ShrinkPolicy::Reject {
            return Err(QueueError::NewCapacityTooSmall);
        }

        // Never drop items: the ring keeps at least `len` slots.
        let slots = new_capacity.max(len);
        state.ring.reallocate(slots);

        debug!(
            old_capacity = state.capacity,
            new_capacity,
            len,
            slots,
            "resizing queue"
        );
        state.capacity = new_capacity;

        drop(state);
        self.changed.notify_all();

        Ok(())
    }

    /// Closes the queue. Afterwards, enqueueing and resizing fail with [`QueueError::Closed`], and dequeueing fails with [`QueueError::Closed`] once all remaining items have been dequeued. Wakes up all blocked callers.
    ///
    /// Returns [`QueueError::Closed`] if the queue had already been closed.
    pub fn close(&self) -> Result<(), QueueError> {
        let mut state = self.lock();

        if state.closed {
            return Err(QueueError::Closed);
        }

        state.closed = true;
        debug!(len = state.ring.len(), "closed queue");

        drop(state);
        self.changed.notify_all();

        Ok(())
    }

    /// A panic while holding the lock cannot leave the state half-updated, so a poisoned lock is used as is.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, State<T>>) -> MutexGuard<'a, State<T>> {
        self.changed
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: fmt::Debug> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();

        f.debug_struct("BoundedQueue")
            .field("capacity", &state.capacity)
            .field("len", &state.ring.len())
            .field("closed", &state.closed)
            .field("items", &DataDebugger(&state.ring))
            .finish()
    }
}
