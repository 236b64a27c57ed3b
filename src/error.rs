use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while putting a program image into memory. The machine is left
/// un-started when one of these is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read ROM {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    TooLarge { size: usize, max_size: usize },
}

/// Fatal conditions raised by a single tick.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("stack overflow: call at {pc:#06x} with all 16 stack levels in use")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#06x} with an empty call stack")]
    StackUnderflow { pc: u16 },
}
