//! Numbering error types.

use thiserror::Error;

use super::types::CounterKey;

/// Errors raised while issuing or parsing document numbers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumberingError {
    /// The per-period sequence ran past 99999.
    #[error("Sequence exhausted for {key} (sequence {sequence} does not fit 5 digits)")]
    SequenceExhausted {
        /// The counter key that overflowed.
        key: CounterKey,
        /// The out-of-range sequence value.
        sequence: u64,
    },

    /// A stored number does not match `<PREFIX><YYYY><MM><NNNNN>`.
    #[error("Malformed document number: {value}")]
    InvalidFormat {
        /// The rejected input.
        value: String,
    },

    /// The atomic counter increment could not complete. The creation
    /// attempt must be aborted; no document may be persisted without a
    /// number.
    #[error("Counter increment failed for {key}: {reason}")]
    CounterUnavailable {
        /// The counter key that could not be incremented.
        key: CounterKey,
        /// Underlying store failure.
        reason: String,
    },
}
