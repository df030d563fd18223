#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::arbitrary;
use libfuzzer_sys::fuzz_target;

use resizable_fifo::Queue;
use resizable_fifo::Ring;

#[derive(Debug, Arbitrary)]
enum Operation<T> {
    Enqueue(T),
    Dequeue,
    Reallocate(u8),
}

fuzz_target!(|data: (Vec<Operation<u8>>, usize)| {
    let operations = data.0;
    let mut capacity = data.1;

    // Restrict capacity to between 1 and 2048 bytes (inclusive).
    if !(1..=2048).contains(&capacity) {
        return;
    }

    let mut control = VecDeque::new();
    let mut test = Ring::new(capacity);

    for operation in operations {
        match operation {
            Operation::Enqueue(item) => {
                let control_result = if control.len() >= capacity {
                    Some(item)
                } else {
                    control.push_back(item);
                    None
                };
                let test_result = test.enqueue(item);
                assert_eq!(test_result, control_result);
            }
            Operation::Dequeue => {
                let control_result = control.pop_front();
                let test_result = test.dequeue();
                assert_eq!(test_result, control_result);
            }
            Operation::Reallocate(new_capacity) => {
                let new_capacity = usize::from(new_capacity);
                if new_capacity == 0 || new_capacity < control.len() {
                    continue;
                }

                capacity = new_capacity;
                test.reallocate(capacity);
                assert_eq!(test.capacity(), capacity);
            }
        }

        assert_eq!(test.len(), control.len());
        assert!(test.iter().eq(control.iter()));
    }
});
