//! Operation surface of the Saral financial engine.
//!
//! The engine executes synchronously per operation: load, compute
//! through `saral-core`, persist through the `saral-store` traits.
//! Version conflicts are retried against fresh state up to the
//! configured bound; every store call carries a timeout; multi-step
//! effects go through the store's atomic commit primitives so they
//! apply fully or not at all.
//!
//! The HTTP/API, authentication, and UI layers are external
//! collaborators: operations take the acting user's id as an argument
//! and return either the updated entity or a typed failure.

pub mod error;
pub mod types;

mod contracts;
mod documents;
mod payments;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use saral_core::numbering::{CounterKey, DocumentNumber, NumberingError, SequenceKind};
use saral_shared::EngineConfig;
use saral_store::{ContractStore, CounterStore, DocumentStore, PaymentStore, StoreError};

pub use error::{EngineError, EngineResult};
pub use types::{
    ApplyPaymentInput, ContractRenewal, ContractView, Conversion, DocumentView, Reconciled,
    TransitionEvent,
};

/// The financial document lifecycle and reconciliation engine.
///
/// Generic over the store; [`saral_store::InMemoryStore`] satisfies
/// every bound for embedded and test use.
pub struct Engine<S> {
    store: Arc<S>,
    config: EngineConfig,
}

impl<S> Clone for Engine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S> Engine<S>
where
    S: CounterStore + DocumentStore + PaymentStore + ContractStore,
{
    /// Creates an engine over a store with the given configuration.
    #[must_use]
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Creates an engine with default configuration.
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, EngineConfig::default())
    }

    /// The configured conflict retry bound.
    pub(crate) fn max_conflict_retries(&self) -> u32 {
        self.config.store.max_conflict_retries
    }

    /// Today's date, used as the projection instant for reads and
    /// transition guards.
    pub(crate) fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Runs a store future under the configured timeout, mapping
    /// elapse and store failures into engine errors.
    pub(crate) async fn store_call<T, F>(&self, fut: F) -> EngineResult<T>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let timeout = Duration::from_millis(self.config.store.timeout_ms);
        match tokio::time::timeout(timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(EngineError::from_store(err)),
            Err(_) => Err(EngineError::Unavailable(format!(
                "store call exceeded {}ms",
                self.config.store.timeout_ms
            ))),
        }
    }

    /// Draws the next number for `kind` in the period containing
    /// `date`.
    ///
    /// Counter failures (including timeout) surface as
    /// [`NumberingError::CounterUnavailable`]: the caller must abort
    /// whatever creation it was numbering: a document is never
    /// persisted without a number, and an issued number is never
    /// reused even if the creation later fails.
    pub(crate) async fn next_number(
        &self,
        kind: SequenceKind,
        date: NaiveDate,
    ) -> EngineResult<DocumentNumber> {
        let key = CounterKey::for_date(kind, date);
        let timeout = Duration::from_millis(self.config.store.timeout_ms);

        let sequence = match tokio::time::timeout(timeout, self.store.next(&key)).await {
            Ok(Ok(sequence)) => sequence,
            Ok(Err(err)) => {
                return Err(NumberingError::CounterUnavailable {
                    key,
                    reason: err.to_string(),
                }
                .into())
            }
            Err(_) => {
                return Err(NumberingError::CounterUnavailable {
                    key,
                    reason: format!("increment exceeded {}ms", self.config.store.timeout_ms),
                }
                .into())
            }
        };

        let prefix = match kind {
            SequenceKind::Quotation => &self.config.numbering.quotation_prefix,
            SequenceKind::Invoice => &self.config.numbering.invoice_prefix,
            SequenceKind::Payment => &self.config.numbering.payment_prefix,
            SequenceKind::Contract => &self.config.numbering.contract_prefix,
        };
        Ok(DocumentNumber::compose(prefix, &key, sequence)?)
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}
