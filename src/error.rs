// src/error.rs

use std::fmt;
use std::io;

/// Errors reported by the buffer and the pipe driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Enqueue was handed no source, or fewer bytes than it was asked to copy.
    InvalidArgument,
    /// Captures OS-specific error codes from the pipe's input or output.
    OsError(u32),
    /// An I/O failure that carries no OS code, such as `WriteZero`.
    Io(io::ErrorKind),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "Invalid argument"),
            Error::OsError(code) => write!(f, "OS error with code: {}", code),
            Error::Io(kind) => write!(f, "I/O error: {}", kind),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        match e.raw_os_error() {
            Some(code) => Error::OsError(code as u32),
            None => Error::Io(e.kind()),
        }
    }
}

impl Error {
    /// Maps the custom `Error` type to process exit codes.
    pub fn to_status_code(&self) -> i32 {
        match self {
            Error::OsError(_) | Error::Io(_) => 1,
            Error::InvalidArgument => 3,
        }
    }
}
