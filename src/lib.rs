//! Fixed-capacity byte FIFO for buffering a stream between one producer
//! and one consumer, plus a small driver that pipes a reader into a writer
//! through it.

pub mod circular_buffer;
pub mod config;
pub mod error;
pub mod pipe;

pub use circular_buffer::{CircularBuffer, DEFAULT_STORE_SIZE};
pub use error::Error;
