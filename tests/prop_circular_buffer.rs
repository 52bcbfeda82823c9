use cbfifo::{CircularBuffer, Error};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Enqueue(Vec<u8>),
    Dequeue(usize),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::collection::vec(any::<u8>(), 0..200).prop_map(Op::Enqueue),
        4 => (0usize..200).prop_map(Op::Dequeue),
        1 => Just(Op::Reset),
    ]
}

/// Replays `ops` against both the buffer and a `VecDeque` bounded at the
/// same capacity, checking counts, contents and the accounting invariants.
fn check_against_model<const N: usize>(ops: &[Op]) -> Result<(), TestCaseError> {
    let mut buf = CircularBuffer::<N>::new();
    let mut model: VecDeque<u8> = VecDeque::new();
    let capacity = buf.capacity();

    for op in ops {
        match op {
            Op::Enqueue(data) => {
                let expected = data.len().min(capacity - model.len());
                let written = buf.enqueue(Some(data.as_slice()), data.len());
                prop_assert_eq!(written, Ok(expected));
                model.extend(&data[..expected]);
            }
            Op::Dequeue(count) => {
                let mut out = vec![0u8; *count];
                let read = buf.dequeue(&mut out, *count);
                prop_assert_eq!(read, (*count).min(model.len()));
                let expected: Vec<u8> = model.drain(..read).collect();
                prop_assert_eq!(&out[..read], &expected[..]);
            }
            Op::Reset => {
                buf.reset();
                model.clear();
                prop_assert_eq!(buf.head(), 0);
                prop_assert_eq!(buf.tail(), 0);
            }
        }

        prop_assert!(buf.head() < N);
        prop_assert!(buf.tail() < N);
        prop_assert_eq!(buf.capacity(), capacity);
        prop_assert_eq!(buf.length(), model.len());
        prop_assert_eq!(buf.length() + buf.available(), capacity);
        prop_assert_eq!(buf.is_empty(), buf.head() == buf.tail());
        prop_assert_eq!(buf.is_full(), buf.length() == capacity);
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_matches_bounded_queue_default_store(ops in prop::collection::vec(op(), 0..60)) {
        check_against_model::<128>(&ops)?;
    }

    #[test]
    fn test_matches_bounded_queue_odd_store(ops in prop::collection::vec(op(), 0..60)) {
        check_against_model::<13>(&ops)?;
    }

    #[test]
    fn test_partial_write_fills_exactly(prefill in 0usize..127, extra in 1usize..300) {
        let mut buf: CircularBuffer = CircularBuffer::new();
        buf.push(&vec![1u8; prefill]);
        let room = buf.available();
        let data = vec![2u8; room + extra];
        prop_assert_eq!(buf.enqueue(Some(data.as_slice()), data.len()), Ok(room));
        prop_assert_eq!(buf.available(), 0);
    }

    #[test]
    fn test_partial_read_drains_exactly(fill in 0usize..=127, extra in 1usize..300) {
        let mut buf: CircularBuffer = CircularBuffer::new();
        buf.push(&vec![9u8; fill]);
        let mut out = vec![0u8; fill + extra];
        prop_assert_eq!(buf.dequeue(&mut out, fill + extra), fill);
        prop_assert_eq!(buf.length(), 0);
    }

    #[test]
    fn test_invalid_source_changes_nothing(
        data in prop::collection::vec(any::<u8>(), 0..127),
        consumed in 0usize..127,
        count in 0usize..500,
    ) {
        let mut buf: CircularBuffer = CircularBuffer::new();
        buf.push(&data);
        let mut sink = vec![0u8; consumed];
        buf.dequeue(&mut sink, consumed);
        let (head, tail, len) = (buf.head(), buf.tail(), buf.length());

        prop_assert_eq!(buf.enqueue(None, count), Err(Error::InvalidArgument));
        prop_assert_eq!((buf.head(), buf.tail(), buf.length()), (head, tail, len));

        let mut rest = vec![0u8; 127];
        let n = buf.dequeue(&mut rest, 127);
        prop_assert_eq!(&rest[..n], &data[consumed.min(data.len())..]);
    }

    #[test]
    fn test_fifo_across_wrap(
        offset in 0usize..128,
        chunks in prop::collection::vec(1usize..40, 1..10),
    ) {
        let mut buf: CircularBuffer = CircularBuffer::new();
        // Move both indices away from zero so later writes wrap.
        let mut sink = vec![0u8; offset];
        buf.push(&vec![0u8; offset.min(127)]);
        buf.dequeue(&mut sink, offset);

        let mut sent = Vec::new();
        let mut next = 0u8;
        for len in chunks {
            let chunk: Vec<u8> = (0..len).map(|i| next.wrapping_add(i as u8)).collect();
            let n = buf.push(&chunk);
            sent.extend_from_slice(&chunk[..n]);
            next = next.wrapping_add(n as u8);
        }

        let mut out = vec![0u8; sent.len()];
        prop_assert_eq!(buf.dequeue(&mut out, sent.len()), sent.len());
        prop_assert_eq!(out, sent);
    }
}
