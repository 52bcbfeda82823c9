use crate::circular_buffer::{CircularBuffer, DEFAULT_STORE_SIZE};
use crate::config::PipeConfig;
use crate::error::Error;
use log::{debug, trace};
use std::io::{self, Read, Write};

/// Counters collected while streaming.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipeStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// Enqueues that accepted fewer bytes than were pending.
    pub short_enqueues: u64,
    /// Dequeues that returned fewer bytes than `consumer_chunk`.
    pub short_dequeues: u64,
    pub peak_length: usize,
}

/// Streams `input` to `output` through a single `CircularBuffer`.
///
/// The producer side reads up to `producer_chunk` bytes at a time and
/// offers whatever is still pending to the buffer; the consumer side asks
/// for `consumer_chunk` bytes per step. Both sides take turns on the same
/// thread, so neither ever waits on the other.
pub struct Pipe<R, W, const N: usize = DEFAULT_STORE_SIZE> {
    input: R,
    output: W,
    fifo: CircularBuffer<N>,
    pending: Vec<u8>,
    pending_pos: usize,
    scratch: Vec<u8>,
    producer_chunk: usize,
    consumer_chunk: usize,
    eof: bool,
    stats: PipeStats,
}

impl<R: Read, W: Write, const N: usize> Pipe<R, W, N> {
    pub fn new(input: R, output: W, cfg: &PipeConfig) -> Self {
        Self {
            input,
            output,
            fifo: CircularBuffer::new(),
            pending: Vec::with_capacity(cfg.producer_chunk.max(1)),
            pending_pos: 0,
            scratch: vec![0; cfg.consumer_chunk.max(1)],
            producer_chunk: cfg.producer_chunk.max(1),
            consumer_chunk: cfg.consumer_chunk.max(1),
            eof: false,
            stats: PipeStats::default(),
        }
    }

    /// Run until the input is exhausted and the buffer has drained.
    pub fn run(&mut self) -> Result<PipeStats, Error> {
        // `pending[pending_pos..]` holds bytes read but not yet accepted.
        loop {
            self.produce()?;
            self.stats.peak_length = self.stats.peak_length.max(self.fifo.length());
            self.consume()?;

            if self.eof && self.pending_pos == self.pending.len() && self.fifo.is_empty() {
                break;
            }
        }
        self.output.flush()?;
        debug!(
            "pipe finished: {} bytes in, {} bytes out",
            self.stats.bytes_in, self.stats.bytes_out
        );
        Ok(self.stats)
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn produce(&mut self) -> Result<(), Error> {
        if self.pending_pos == self.pending.len() && !self.eof {
            self.refill()?;
        }
        let remaining = self.pending.len() - self.pending_pos;
        if remaining == 0 {
            return Ok(());
        }

        let written = self
            .fifo
            .enqueue(Some(&self.pending[self.pending_pos..]), remaining)?;
        self.pending_pos += written;
        if written < remaining {
            self.stats.short_enqueues += 1;
            trace!("buffer accepted {} of {} pending bytes", written, remaining);
        }
        Ok(())
    }

    fn refill(&mut self) -> Result<(), Error> {
        self.pending.resize(self.producer_chunk, 0);
        self.pending_pos = 0;
        let n = loop {
            match self.input.read(&mut self.pending) {
                Ok(n) => break n,
                // Retry if the call was interrupted.
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        self.pending.truncate(n);
        if n == 0 {
            debug!("input reached EOF after {} bytes", self.stats.bytes_in);
            self.eof = true;
        }
        self.stats.bytes_in += n as u64;
        Ok(())
    }

    fn consume(&mut self) -> Result<(), Error> {
        let n = self.fifo.dequeue(&mut self.scratch, self.consumer_chunk);
        if n < self.consumer_chunk {
            self.stats.short_dequeues += 1;
        }
        if n > 0 {
            self.output.write_all(&self.scratch[..n])?;
            self.stats.bytes_out += n as u64;
        }
        Ok(())
    }
}
