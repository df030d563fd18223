#![no_std]

//! A thread-safe, bounded [FIFO queue](https://en.wikipedia.org/wiki/Queue_(abstract_data_type)) backed by a resizable ring buffer.
//!
//! The central type is [`BoundedQueue`], which supports non-blocking ([`try_enqueue`](BoundedQueue::try_enqueue), [`try_dequeue`](BoundedQueue::try_dequeue)) and blocking ([`enqueue`](BoundedQueue::enqueue), [`dequeue`](BoundedQueue::dequeue)) transfer of items, changing its capacity at runtime without losing items ([`resize`](BoundedQueue::resize)), and [closing](BoundedQueue::close) the queue, which releases all blocked callers and disables further enqueueing.
//!
//! ```
//! use resizable_fifo::{BoundedQueue, QueueError};
//!
//! let queue = BoundedQueue::new(3)?;
//!
//! queue.enqueue("A")?;
//! queue.enqueue("B")?;
//! queue.enqueue("C")?;
//! assert_eq!(queue.len(), 3);
//! assert_eq!(queue.try_enqueue("X"), Err(QueueError::Full));
//!
//! assert_eq!(queue.dequeue()?, "A");
//! queue.enqueue("D")?;
//!
//! queue.resize(4)?;
//! assert_eq!(queue.capacity(), 4);
//! queue.enqueue("E")?;
//!
//! queue.close()?;
//! assert_eq!(queue.dequeue()?, "B");
//! assert_eq!(queue.dequeue()?, "C");
//! assert_eq!(queue.dequeue()?, "D");
//! assert_eq!(queue.dequeue()?, "E");
//! assert_eq!(queue.dequeue(), Err(QueueError::Closed));
//! # Ok::<(), QueueError>(())
//! ```
//!
//! Underneath, the crate also exposes the single-threaded building blocks: the [`Queue`] trait and the [`Ring`] buffer implementing it. These do not require the standard library.
//!
//! ## Features
//!
//! The `std` feature (enabled by default) provides [`BoundedQueue`], which relies on the mutexes and condition variables of the standard library. The `alloc` feature is implied by `std`; [`Ring`] always allocates its storage on the heap.
//!
//! The `tracing` feature emits structured log events (resizes, closing, blocked callers) via the [`tracing`](https://docs.rs/tracing) crate.

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

#[cfg(feature = "std")]
mod trace;

mod error;
pub use error::QueueError;

mod ring;
pub use ring::Ring;

#[cfg(feature = "std")]
mod bounded;
#[cfg(feature = "std")]
pub use bounded::{BoundedQueue, ShrinkPolicy};

/// A first-in-first-out queue, operated on by a single owner.
///
/// This trait describes infallible in-memory queues; its methods are synchronous and report a full or empty queue through their return values only. See [`BoundedQueue`] for a queue that can be shared between threads.
pub trait Queue {
    /// The type of items to manage in the queue.
    type Item;

    /// Returns the number of items currently in the queue.
    fn len(&self) -> usize;

    /// Returns whether the queue is empty. Must return `true` if and only if `self.len()` returns `0`.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempts to enqueue an item.
    ///
    /// Will return the item instead of enqueueing it if the queue is full at the time of calling.
    fn enqueue(&mut self, item: Self::Item) -> Option<Self::Item>;

    /// Attempts to dequeue the next item.
    ///
    /// Will return `None` if the queue is empty at the time of calling.
    fn dequeue(&mut self) -> Option<Self::Item>;
}
