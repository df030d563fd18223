use alloc::boxed::Box;
use alloc::vec::Vec;

use core::fmt;

use crate::Queue;

/// A queue holding up to a certain number of items in a heap-allocated ring-buffer. Unlike a fixed-capacity queue, the buffer can be [reallocated](Ring::reallocate) to a different size while keeping all queued items.
///
/// Slots that hold no item are `None`, so dequeueing moves the item out of the buffer instead of leaving a stale copy behind.
///
/// Use the methods of the [Queue] trait implementation to interact with the contents of the queue.
pub struct Ring<T> {
    /// Slice of memory, used as a ring-buffer.
    data: Box<[Option<T>]>,
    /// Read index.
    read: usize,
    /// Amount of valid data.
    amount: usize,
}

impl<T> Ring<T> {
    /// Creates a queue with room for `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero, or if the memory allocation fails.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "a ring buffer needs at least one slot");

        Ring {
            data: empty_slots(capacity),
            read: 0,
            amount: 0,
        }
    }

    /// Returns the number of item slots of the buffer.
    ///
    /// The number of free item slots at any time is `q.capacity() - q.len()`.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns whether every slot holds an item.
    pub fn is_full(&self) -> bool {
        self.amount == self.capacity()
    }

    /// Replaces the buffer with one of `capacity` slots. The queued items keep their order, the next item to dequeue moves to the start of the new buffer.
    ///
    /// Takes time linear in the number of queued items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or smaller than the number of queued items.
    pub fn reallocate(&mut self, capacity: usize) {
        assert!(capacity > 0, "a ring buffer needs at least one slot");
        assert!(
            capacity >= self.amount,
            "cannot reallocate {} items into {} slots",
            self.amount,
            capacity
        );

        let mut data = Vec::with_capacity(capacity);

        if self.is_data_contiguous() {
            let occupied = &mut self.data[self.read..self.read + self.amount];
            data.extend(occupied.iter_mut().map(Option::take));
        } else {
            let wrapped = self.amount - (self.capacity() - self.read);
            data.extend(self.data[self.read..].iter_mut().map(Option::take));
            data.extend(self.data[..wrapped].iter_mut().map(Option::take));
        }

        data.resize_with(capacity, || None);

        self.data = data.into_boxed_slice();
        self.read = 0;
    }

    /// Returns an iterator over the queued items, from the next one to be dequeued to the most recently enqueued one.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (first, second) = self.occupied();
        first.iter().chain(second).filter_map(Option::as_ref)
    }

    /// Whether the queued items occupy a single run of slots, without wrapping around the end of the buffer.
    fn is_data_contiguous(&self) -> bool {
        self.read + self.amount <= self.capacity()
    }

    /// The occupied slots, in dequeueing order.
    fn occupied(&self) -> (&[Option<T>], &[Option<T>]) {
        if self.is_data_contiguous() {
            let none: &[Option<T>] = &[];
            (&self.data[self.read..self.read + self.amount], none)
        } else {
            let wrapped = self.amount - (self.capacity() - self.read);
            (&self.data[self.read..], &self.data[..wrapped])
        }
    }

    fn write_to(&self) -> usize {
        (self.read + self.amount) % self.capacity()
    }
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    let mut v = Vec::with_capacity(capacity);
    v.resize_with(capacity, || None);
    v.into_boxed_slice()
}

impl<T> Queue for Ring<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.amount
    }

    fn enqueue(&mut self, item: T) -> Option<T> {
        if self.is_full() {
            Some(item)
        } else {
            let write_to = self.write_to();
            self.data[write_to] = Some(item);
            self.amount += 1;

            None
        }
    }

    fn dequeue(&mut self) -> Option<T> {
        if self.amount == 0 {
            None
        } else {
            let item = self.data[self.read].take();
            // Advance the read index by 1 or reset to 0 if at capacity.
            self.read = (self.read + 1) % self.capacity();
            self.amount -= 1;

            item
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("capacity", &self.capacity())
            .field("len", &self.amount)
            .field("data", &DataDebugger(self))
            .finish()
    }
}

pub(crate) struct DataDebugger<'q, T>(pub(crate) &'q Ring<T>);

impl<T: fmt::Debug> fmt::Debug for DataDebugger<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec;

    use super::*;

    fn drain<T>(queue: &mut Ring<T>) -> Vec<T> {
        let mut items = Vec::new();
        while let Some(item) = queue.dequeue() {
            items.push(item);
        }
        items
    }

    #[test]
    fn enqueues_and_dequeues_with_correct_amount() {
        let mut queue: Ring<u8> = Ring::new(4);

        assert_eq!(queue.enqueue(7), None);
        assert_eq!(queue.enqueue(21), None);
        assert_eq!(queue.enqueue(196), None);
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.enqueue(233), None);
        assert_eq!(queue.len(), 4);

        // Queue should be first-in, first-out.
        assert_eq!(queue.dequeue(), Some(7));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn returns_item_on_enqueue_when_queue_is_full() {
        let mut queue: Ring<u8> = Ring::new(1);

        assert_eq!(queue.enqueue(7), None);
        assert!(queue.is_full());

        assert_eq!(queue.enqueue(0), Some(0))
    }

    #[test]
    fn returns_none_on_dequeue_when_queue_is_empty() {
        let mut queue: Ring<u8> = Ring::new(1);

        // Enqueue and then dequeue an item.
        let _ = queue.enqueue(7);
        let _ = queue.dequeue();

        // The queue is now empty.
        assert!(queue.dequeue().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn keeps_order_across_wraparound() {
        let mut queue: Ring<u8> = Ring::new(3);

        assert_eq!(queue.enqueue(1), None);
        assert_eq!(queue.enqueue(2), None);
        assert_eq!(queue.enqueue(3), None);
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));

        // Writes wrap around to the start of the buffer.
        assert_eq!(queue.enqueue(4), None);
        assert_eq!(queue.enqueue(5), None);

        assert_eq!(drain(&mut queue), vec![3, 4, 5]);
    }

    #[test]
    fn dequeue_clears_the_slot() {
        let item = alloc::rc::Rc::new(17);
        let mut queue = Ring::new(2);

        assert!(queue.enqueue(alloc::rc::Rc::clone(&item)).is_none());
        assert_eq!(alloc::rc::Rc::strong_count(&item), 2);

        drop(queue.dequeue());
        assert_eq!(alloc::rc::Rc::strong_count(&item), 1);
    }

    #[test]
    fn reallocate_grows_contiguous_data() {
        let mut queue: Ring<u8> = Ring::new(3);
        let _ = queue.enqueue(1);
        let _ = queue.enqueue(2);

        queue.reallocate(5);
        assert_eq!(queue.capacity(), 5);
        assert_eq!(queue.len(), 2);

        for item in 3..=5 {
            assert_eq!(queue.enqueue(item), None);
        }
        assert_eq!(queue.enqueue(6), Some(6));
        assert_eq!(drain(&mut queue), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn reallocate_unwraps_wrapped_data() {
        let mut queue: Ring<u8> = Ring::new(5);
        for item in 1..=5 {
            let _ = queue.enqueue(item);
        }
        let _ = queue.dequeue();
        let _ = queue.dequeue();
        let _ = queue.enqueue(6);

        // Items 3, 4, 5 sit at the end of the buffer, item 6 at its start.
        queue.reallocate(4);
        assert_eq!(queue.capacity(), 4);
        assert!(queue.is_full());
        assert_eq!(drain(&mut queue), vec![3, 4, 5, 6]);
    }

    #[test]
    fn reallocate_full_buffer_with_read_at_start() {
        let mut queue: Ring<u8> = Ring::new(3);
        for item in 1..=3 {
            let _ = queue.enqueue(item);
        }

        queue.reallocate(3);
        assert_eq!(queue.enqueue(4), Some(4));
        assert_eq!(drain(&mut queue), vec![1, 2, 3]);
    }

    #[test]
    fn reallocate_empty_buffer() {
        let mut queue: Ring<u8> = Ring::new(2);
        let _ = queue.enqueue(1);
        let _ = queue.dequeue();

        queue.reallocate(1);
        assert_eq!(queue.capacity(), 1);
        assert_eq!(queue.enqueue(9), None);
        assert_eq!(drain(&mut queue), vec![9]);
    }

    #[test]
    #[should_panic]
    fn reallocate_panics_when_items_do_not_fit() {
        let mut queue: Ring<u8> = Ring::new(3);
        let _ = queue.enqueue(1);
        let _ = queue.enqueue(2);

        queue.reallocate(1);
    }

    #[test]
    #[should_panic]
    fn new_panics_on_zero_capacity() {
        let _queue: Ring<u8> = Ring::new(0);
    }

    #[test]
    fn test_debug_impl() {
        let mut queue: Ring<u8> = Ring::new(4);

        assert_eq!(queue.enqueue(7), None);
        assert_eq!(queue.enqueue(21), None);
        assert_eq!(queue.enqueue(196), None);
        assert_eq!(
            format!("{:?}", queue),
            "Ring { capacity: 4, len: 3, data: [7, 21, 196] }"
        );

        assert_eq!(queue.dequeue(), Some(7));
        assert_eq!(queue.dequeue(), Some(21));
        assert_eq!(
            format!("{:?}", queue),
            "Ring { capacity: 4, len: 1, data: [196] }"
        );

        assert_eq!(queue.enqueue(33), None);
        assert_eq!(queue.enqueue(17), None);
        assert_eq!(queue.enqueue(200), None);
        assert_eq!(
            format!("{:?}", queue),
            "Ring { capacity: 4, len: 4, data: [196, 33, 17, 200] }"
        );
    }
}
