#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::arbitrary;
use libfuzzer_sys::fuzz_target;

use resizable_fifo::{BoundedQueue, QueueError, ShrinkPolicy};

#[derive(Debug, Arbitrary)]
enum Operation<T> {
    TryEnqueue(T),
    Enqueue(T),
    TryDequeue,
    Dequeue,
    Resize(u8),
    Close,
}

/// A single-threaded reference for the behaviour of a `BoundedQueue`.
struct Control<T> {
    items: VecDeque<T>,
    capacity: usize,
    closed: bool,
    shrink_policy: ShrinkPolicy,
}

impl<T> Control<T> {
    fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    fn enqueue(&mut self, item: T) -> Result<(), QueueError> {
        if self.closed {
            Err(QueueError::Closed)
        } else if self.is_full() {
            Err(QueueError::Full)
        } else {
            self.items.push_back(item);
            Ok(())
        }
    }

    fn dequeue(&mut self) -> Result<T, QueueError> {
        match self.items.pop_front() {
            Some(item) => Ok(item),
            None if self.closed => Err(QueueError::Closed),
            None => Err(QueueError::Empty),
        }
    }

    fn resize(&mut self, new_capacity: usize) -> Result<(), QueueError> {
        if new_capacity == self.capacity {
            Ok(())
        } else if new_capacity == 0 {
            Err(QueueError::CapacityNotPositive)
        } else if self.closed {
            Err(QueueError::Closed)
        } else if new_capacity < self.items.len() && self.shrink_policy == ShrinkPolicy::Reject {
            Err(QueueError::NewCapacityTooSmall)
        } else {
            self.capacity = new_capacity;
            Ok(())
        }
    }

    fn close(&mut self) -> Result<(), QueueError> {
        if self.closed {
            Err(QueueError::Closed)
        } else {
            self.closed = true;
            Ok(())
        }
    }
}

fuzz_target!(|data: (Vec<Operation<u8>>, u8, bool)| {
    let (operations, capacity, reject_shrinking) = data;
    let capacity = usize::from(capacity);

    let shrink_policy = if reject_shrinking {
        ShrinkPolicy::Reject
    } else {
        ShrinkPolicy::Retain
    };

    let test = match BoundedQueue::with_shrink_policy(capacity, shrink_policy) {
        Ok(queue) => queue,
        Err(err) => {
            assert_eq!(capacity, 0);
            assert_eq!(err, QueueError::CapacityNotPositive);
            return;
        }
    };

    let mut control = Control {
        items: VecDeque::new(),
        capacity,
        closed: false,
        shrink_policy,
    };

    for operation in operations {
        match operation {
            Operation::TryEnqueue(item) => {
                assert_eq!(test.try_enqueue(item), control.enqueue(item));
            }
            Operation::Enqueue(item) => {
                // A single thread must never wait on itself.
                if control.is_full() && !control.closed {
                    continue;
                }
                assert_eq!(test.enqueue(item), control.enqueue(item));
            }
            Operation::TryDequeue => {
                assert_eq!(test.try_dequeue(), control.dequeue());
            }
            Operation::Dequeue => {
                if control.items.is_empty() && !control.closed {
                    continue;
                }
                assert_eq!(test.dequeue(), control.dequeue());
            }
            Operation::Resize(new_capacity) => {
                let new_capacity = usize::from(new_capacity);
                assert_eq!(test.resize(new_capacity), control.resize(new_capacity));
            }
            Operation::Close => {
                assert_eq!(test.close(), control.close());
            }
        }

        assert_eq!(test.len(), control.items.len());
        assert_eq!(test.capacity(), control.capacity);
        assert_eq!(test.is_closed(), control.closed);
    }
});
