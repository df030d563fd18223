use thiserror::Error;

/// Everything that can go wrong when operating on a [`BoundedQueue`](crate::BoundedQueue).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum QueueError {
    /// The queue held as many items as its capacity allows.
    #[error("queue is full")]
    Full,
    /// The queue held no items.
    #[error("queue is empty")]
    Empty,
    /// A capacity of zero was requested.
    #[error("capacity must be positive")]
    CapacityNotPositive,
    /// The queue has been closed. Returned by every enqueueing operation after closing, by dequeueing operations once a closed queue has been drained, and by closing a second time.
    #[error("queue is closed")]
    Closed,
    /// A resize to fewer slots than there are queued items was rejected, see [`ShrinkPolicy::Reject`](crate::ShrinkPolicy::Reject).
    #[error("new capacity is smaller than the number of queued items")]
    NewCapacityTooSmall,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn displays_lowercase_messages() {
        assert_eq!(QueueError::Full.to_string(), "queue is full");
        assert_eq!(QueueError::Empty.to_string(), "queue is empty");
        assert_eq!(
            QueueError::CapacityNotPositive.to_string(),
            "capacity must be positive"
        );
        assert_eq!(QueueError::Closed.to_string(), "queue is closed");
    }
}
