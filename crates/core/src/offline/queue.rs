//! The durable FIFO queue and drain loop.

use std::collections::VecDeque;
use std::future::Future;

use chrono::{DateTime, Utc};
use saral_shared::types::MutationId;

use super::error::ReplayError;
use super::types::{DrainOutcome, Method, QueuedMutation};

/// A FIFO queue of deferred write operations.
///
/// Durability is the embedder's: [`MutationQueue::snapshot`] after
/// each change and [`MutationQueue::restore`] on startup round-trip
/// the full queue state through whatever storage the client has.
#[derive(Debug, Default)]
pub struct MutationQueue {
    entries: VecDeque<QueuedMutation>,
}

impl MutationQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a queue from a snapshot, preserving order.
    #[must_use]
    pub fn restore(entries: Vec<QueuedMutation>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Returns the current queue state for persistence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<QueuedMutation> {
        self.entries.iter().cloned().collect()
    }

    /// Appends a deferred write and returns its id.
    pub fn enqueue(
        &mut self,
        method: Method,
        target: impl Into<String>,
        payload: serde_json::Value,
        now: DateTime<Utc>,
    ) -> MutationId {
        let id = MutationId::new();
        self.entries.push_back(QueuedMutation {
            id,
            method,
            target: target.into(),
            payload,
            enqueued_at: now,
            attempts: 0,
            last_error: None,
        });
        id
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose last replay failed, for surfacing to the user.
    pub fn failures(&self) -> impl Iterator<Item = &QueuedMutation> {
        self.entries.iter().filter(|e| e.last_error.is_some())
    }

    /// Replays every queued entry strictly in enqueue order.
    ///
    /// Triggered by the embedder's reconnect ("online") event. The
    /// drain is sequential, never parallel, to preserve ordering. An
    /// entry that fails is retained with its attempt count and error
    /// recorded, and later entries are still attempted; relative order
    /// of retained entries is unchanged for the next reconnect.
    pub async fn drain<D, Fut>(&mut self, mut dispatch: D) -> DrainOutcome
    where
        D: FnMut(QueuedMutation) -> Fut,
        Fut: Future<Output = Result<(), ReplayError>>,
    {
        let mut outcome = DrainOutcome::default();
        let mut retained = VecDeque::new();

        while let Some(mut entry) = self.entries.pop_front() {
            entry.attempts += 1;
            match dispatch(entry.clone()).await {
                Ok(()) => {
                    outcome.replayed += 1;
                }
                Err(err) => {
                    entry.last_error = Some(err.to_string());
                    retained.push_back(entry);
                    outcome.failed += 1;
                }
            }
        }

        self.entries = retained;
        outcome
    }
}
