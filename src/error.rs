use std::io;

use thiserror::Error;

/// Failure kinds for one simulation run.
///
/// None of these are recoverable: the run either processes the whole address
/// stream or stops at the first error, so the statistics never describe a
/// partially processed stream.
#[derive(Error, Debug)]
pub enum VmError {
    #[error("cannot access backing store: {source}")]
    BackingStore { source: io::Error },

    #[error("backing store ends before page {page}")]
    ShortRead { page: u32 },

    #[error("out of physical frames: every frame is already assigned")]
    FrameCapacityExhausted,

    #[error("malformed address token {token:?}")]
    MalformedAddress { token: String },

    #[error("cannot read address file: {source}")]
    AddressFile { source: io::Error },

    #[error("cannot read reference file: {source}")]
    Reference { source: io::Error },
}
