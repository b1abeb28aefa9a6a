//! Queued mutation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use saral_shared::types::MutationId;

/// Request method of a deferred write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Create a resource.
    Post,
    /// Replace a resource.
    Put,
    /// Partially update a resource.
    Patch,
    /// Remove a resource.
    Delete,
}

impl Method {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One deferred write operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedMutation {
    /// Unique identifier.
    pub id: MutationId,
    /// Request method.
    pub method: Method,
    /// Target resource (e.g. `invoices/{id}/payments`).
    pub target: String,
    /// Request payload.
    pub payload: serde_json::Value,
    /// When the mutation was queued.
    pub enqueued_at: DateTime<Utc>,
    /// Replay attempts so far.
    pub attempts: u32,
    /// Error from the most recent failed replay, surfaced to the user.
    pub last_error: Option<String>,
}

/// Result of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainOutcome {
    /// Entries replayed successfully and removed from the queue.
    pub replayed: usize,
    /// Entries that failed and remain queued.
    pub failed: usize,
}
