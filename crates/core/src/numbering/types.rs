//! Period keys and the document number format.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::NumberingError;

/// Which sequence a number is drawn from.
///
/// Each kind has its own counter per period; sequences never cross
/// kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceKind {
    /// Quotation numbers.
    Quotation,
    /// Invoice numbers.
    Invoice,
    /// Payment numbers.
    Payment,
    /// AMC contract numbers.
    Contract,
}

impl SequenceKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quotation => "quotation",
            Self::Invoice => "invoice",
            Self::Payment => "payment",
            Self::Contract => "contract",
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A year-month numbering period. Sequences reset at each period
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
}

impl Period {
    /// Builds the period containing the given date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

/// Key identifying one atomic sequence counter.
///
/// Owned exclusively by the store's counter primitive; no other
/// component reads or writes the underlying value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterKey {
    /// Which sequence.
    pub kind: SequenceKind,
    /// Which year-month period.
    pub period: Period,
}

impl CounterKey {
    /// Creates a counter key for a kind and the period containing
    /// `date`.
    #[must_use]
    pub fn for_date(kind: SequenceKind, date: NaiveDate) -> Self {
        Self {
            kind,
            period: Period::from_date(date),
        }
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.period)
    }
}

/// Maximum sequence value that fits the 5-digit segment.
const MAX_SEQUENCE: u64 = 99_999;

/// A composed document number: `<PREFIX><YYYY><MM><NNNNN>`.
///
/// The format is a bit-exact persistence contract; numbers issued once
/// are never reused, including after voids or cancellations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentNumber(String);

impl DocumentNumber {
    /// Composes a number from a prefix, period, and sequence value.
    ///
    /// # Errors
    ///
    /// Returns `NumberingError::SequenceExhausted` if the sequence does
    /// not fit 5 digits.
    pub fn compose(
        prefix: &str,
        key: &CounterKey,
        sequence: u64,
    ) -> Result<Self, NumberingError> {
        if sequence == 0 || sequence > MAX_SEQUENCE {
            return Err(NumberingError::SequenceExhausted {
                key: *key,
                sequence,
            });
        }
        Ok(Self(format!("{prefix}{}{sequence:05}", key.period)))
    }

    /// Parses a stored number back into prefix, period, and sequence.
    ///
    /// The trailing 11 characters are `YYYYMMNNNNN`; everything before
    /// them is the prefix.
    ///
    /// # Errors
    ///
    /// Returns `NumberingError::InvalidFormat` if the input does not
    /// match the contract.
    pub fn parse(value: &str) -> Result<(String, Period, u64), NumberingError> {
        let invalid = || NumberingError::InvalidFormat {
            value: value.to_string(),
        };

        if value.len() < 12 {
            return Err(invalid());
        }
        let split = value.len() - 11;
        if !value.is_char_boundary(split) {
            return Err(invalid());
        }
        let (prefix, digits) = value.split_at(split);
        if prefix.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = digits[..4].parse().map_err(|_| invalid())?;
        let month: u32 = digits[4..6].parse().map_err(|_| invalid())?;
        let sequence: u64 = digits[6..].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) || sequence == 0 {
            return Err(invalid());
        }

        Ok((prefix.to_string(), Period { year, month }, sequence))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
