//! Simulation-time failure taxonomy.

use thiserror::Error;

/// Environmental failures raised while a simulation is running or while a
/// backing store is being pre-loaded.
///
/// Unlike [`crate::instr::EncodeError`], which marks programmer error in
/// describing a test program, these describe conditions the harness
/// detects against live state. None of them is retried; the driver loop
/// decides whether a failed cycle aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimFault {
    /// A bus transaction addressed a word beyond the backing store.
    ///
    /// The store is left untouched; the transaction fails loudly instead
    /// of wrapping or truncating the address.
    #[error("bus address {addr:#010x} outside backing store of {words} words")]
    AddressOutOfRange {
        /// The out-of-range word address.
        addr: u32,
        /// Backing store size in words.
        words: usize,
    },
    /// A bulk pre-load would run past the end of the backing store.
    #[error("image of {words} words overflows backing store of {capacity} words")]
    ImageOverflow {
        /// Words the image holds.
        words: usize,
        /// Words the store holds.
        capacity: usize,
    },
    /// A memory-image record is not an 8-digit hexadecimal word.
    #[error("malformed image record {token:?} on line {line}")]
    MalformedImage {
        /// 1-indexed image line.
        line: usize,
        /// The offending record text.
        token: String,
    },
}
