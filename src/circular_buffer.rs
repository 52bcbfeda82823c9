use crate::error::Error;
use log::{debug, trace};

/// Backing store size used when none is given: 127 usable bytes.
pub const DEFAULT_STORE_SIZE: usize = 128;

/// Fixed-capacity byte FIFO over an inline store of `N` bytes.
///
/// One slot always stays free so that `head == tail` means empty, which
/// gives a usable capacity of `N - 1`. Indices wrap with `% N`, so `N`
/// does not have to be a power of two.
#[derive(Debug, Clone)]
pub struct CircularBuffer<const N: usize = DEFAULT_STORE_SIZE> {
    store: [u8; N],
    head: usize,
    tail: usize,
}

impl<const N: usize> CircularBuffer<N> {
    const STORE_NOT_EMPTY: () = assert!(N >= 1, "backing store must hold at least one byte");

    /// Usable bytes: one slot of the store is always kept free.
    pub const CAPACITY: usize = N - 1;

    pub const fn new() -> Self {
        let () = Self::STORE_NOT_EMPTY;
        Self {
            store: [0; N],
            head: 0,
            tail: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        Self::CAPACITY
    }

    /// Number of bytes waiting to be dequeued.
    pub fn length(&self) -> usize {
        (self.tail + N - self.head) % N
    }

    pub fn available(&self) -> usize {
        self.capacity() - self.length()
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        (self.tail + 1) % N == self.head
    }

    /// Index of the oldest unread byte.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Index of the next free slot.
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Copy up to `count` bytes from `source` into the buffer.
    ///
    /// Writes `min(available(), count)` bytes and returns how many were
    /// written, which may be zero when the buffer is full. A missing
    /// source, or one shorter than `count`, is rejected with
    /// [`Error::InvalidArgument`] before anything is touched.
    pub fn enqueue(&mut self, source: Option<&[u8]>, count: usize) -> Result<usize, Error> {
        let data = match source {
            Some(data) if data.len() >= count => &data[..count],
            Some(data) => {
                debug!(
                    "enqueue rejected: asked for {} bytes from a {} byte source",
                    count,
                    data.len()
                );
                return Err(Error::InvalidArgument);
            }
            None => {
                debug!("enqueue rejected: no source for {} bytes", count);
                return Err(Error::InvalidArgument);
            }
        };
        Ok(self.push(data))
    }

    /// Enqueue as much of `data` as fits, returning the number of bytes taken.
    pub fn push(&mut self, data: &[u8]) -> usize {
        let to_write = data.len().min(self.available());
        for (i, &byte) in data[..to_write].iter().enumerate() {
            self.store[(self.tail + i) % N] = byte;
        }
        self.tail = (self.tail + to_write) % N;

        if to_write < data.len() {
            trace!("short enqueue: {} of {} bytes", to_write, data.len());
        }
        to_write
    }

    /// Copy up to `count` of the oldest bytes into `destination`.
    ///
    /// The transfer is further limited by `destination.len()`. Returns the
    /// number of bytes copied, zero when the buffer is empty.
    ///
    /// Unlike [`enqueue`](Self::enqueue), a short slice is not an error here:
    /// a small destination only shortens the read, so nothing can be lost.
    pub fn dequeue(&mut self, destination: &mut [u8], count: usize) -> usize {
        let wanted = count.min(destination.len());
        let to_read = wanted.min(self.length());
        for (i, slot) in destination[..to_read].iter_mut().enumerate() {
            *slot = self.store[(self.head + i) % N];
        }
        self.head = (self.head + to_read) % N;

        if to_read < wanted {
            trace!("short dequeue: {} of {} bytes", to_read, wanted);
        }
        to_read
    }

    /// Zero the whole store and rewind both indices.
    pub fn reset(&mut self) {
        self.store.fill(0);
        self.head = 0;
        self.tail = 0;
    }
}

impl<const N: usize> Default for CircularBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
