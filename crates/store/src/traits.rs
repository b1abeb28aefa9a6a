//! Store traits the engine is generic over.

use async_trait::async_trait;

use saral_core::contract::AmcContract;
use saral_core::document::FinancialDocument;
use saral_core::numbering::CounterKey;
use saral_core::payment::Payment;
use saral_shared::types::{ContractId, DocumentId, PaymentId};

use crate::error::StoreError;

/// Atomic per-period sequence counters.
///
/// The counter value is owned exclusively by this trait; no other
/// component reads or writes it.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increments the counter for `key` and returns the new
    /// value. The first call for a key returns 1.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the increment could not
    /// complete; the caller must abort the creation it was numbering.
    async fn next(&self, key: &CounterKey) -> Result<u64, StoreError>;
}

/// Versioned storage for financial documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a new document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if the id is already taken.
    async fn insert_document(&self, document: FinancialDocument) -> Result<(), StoreError>;

    /// Loads a document by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for unknown ids.
    async fn get_document(&self, id: DocumentId) -> Result<FinancialDocument, StoreError>;

    /// Conditionally replaces a document.
    ///
    /// Succeeds only if the stored version equals `expected_version`;
    /// the stored version is bumped and the updated document returned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` on version mismatch.
    async fn update_document(
        &self,
        document: FinancialDocument,
        expected_version: u64,
    ) -> Result<FinancialDocument, StoreError>;

    /// Atomically records a quotation conversion: the quotation update
    /// (conditional on `expected_version`) and the new invoice insert
    /// both apply or neither does.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` or `StoreError::Duplicate`; on
    /// either, nothing is persisted.
    async fn commit_conversion(
        &self,
        quotation: FinancialDocument,
        expected_version: u64,
        invoice: FinancialDocument,
    ) -> Result<FinancialDocument, StoreError>;
}

/// Payment records and their atomic pairing with invoice updates.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Loads a payment by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for unknown ids.
    async fn get_payment(&self, id: PaymentId) -> Result<Payment, StoreError>;

    /// All payments applied to an invoice, voided ones included, in
    /// creation order.
    async fn payments_for_invoice(
        &self,
        invoice_id: DocumentId,
    ) -> Result<Vec<Payment>, StoreError>;

    /// Atomically inserts a payment and conditionally updates its
    /// invoice. Serializes with other commits against the same
    /// invoice; a stale `expected_version` fails the whole commit.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` on version mismatch; nothing is
    /// persisted.
    async fn commit_payment(
        &self,
        invoice: FinancialDocument,
        expected_version: u64,
        payment: Payment,
    ) -> Result<FinancialDocument, StoreError>;

    /// Atomically replaces a payment record (void path) and
    /// conditionally updates its invoice.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` on version mismatch; nothing is
    /// persisted.
    async fn commit_void(
        &self,
        payment: Payment,
        invoice: FinancialDocument,
        expected_version: u64,
    ) -> Result<FinancialDocument, StoreError>;
}

/// Versioned storage for AMC contracts.
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Persists a new contract.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if the id is already taken.
    async fn insert_contract(&self, contract: AmcContract) -> Result<(), StoreError>;

    /// Loads a contract by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for unknown ids.
    async fn get_contract(&self, id: ContractId) -> Result<AmcContract, StoreError>;

    /// Conditionally replaces a contract.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` on version mismatch.
    async fn update_contract(
        &self,
        contract: AmcContract,
        expected_version: u64,
    ) -> Result<AmcContract, StoreError>;

    /// Atomically records a renewal: the retired contract update
    /// (conditional on `expected_version`) and the successor insert
    /// both apply or neither does.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` or `StoreError::Duplicate`; on
    /// either, nothing is persisted.
    async fn commit_renewal(
        &self,
        retired: AmcContract,
        expected_version: u64,
        successor: AmcContract,
    ) -> Result<AmcContract, StoreError>;
}
