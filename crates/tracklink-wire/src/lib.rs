//! Primitive binary codec for the tracklink companion protocol.
//!
//! The protocol has no outer frame length, so every field is decoded
//! directly from the stream:
//! - `u32`: 4 bytes, little-endian
//! - string: `u32` byte-length prefix followed by that many UTF-8 bytes
//! - bool: a single byte, 0 or 1
//!
//! No partial values ever escape: a field that cannot be read in full
//! fails with [`WireError::TruncatedRead`].

pub mod codec;
pub mod error;

pub use codec::{
    read_bool, read_string, read_u32, write_bool, write_string, write_u32, MAX_STRING_LEN,
};
pub use error::{Result, WireError};
