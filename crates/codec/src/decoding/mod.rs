//! Decoding implementations for the commit data.

/// Batch header decoding, dispatching on the version byte.
pub mod batch_header;

/// Constants of the encodings.
pub mod constants;

mod macros;

/// V0 implementation of the decoding.
pub mod v0;

/// V1 implementation of the decoding.
pub mod v1;
