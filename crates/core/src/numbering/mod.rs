//! Document number format and period keys.
//!
//! Numbers follow the persisted `<PREFIX><YYYY><MM><NNNNN>` contract
//! (e.g. `INV20260800001`); the 5-digit sequence restarts every month.
//! The atomic per-period counter itself is owned by the store layer;
//! this module only knows how to key it and how to compose/parse the
//! resulting numbers.

pub mod error;
pub mod types;

pub use error::NumberingError;
pub use types::{CounterKey, DocumentNumber, Period, SequenceKind};
