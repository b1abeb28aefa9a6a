//! Embedded in-memory reference store.
//!
//! Backed by `DashMap`; shard write guards give each conditional
//! update its atomicity. Multi-entity commits take their locks in a
//! fixed order (documents, then payments) so concurrent payment
//! commits and voids against one invoice serialize instead of
//! deadlocking.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use saral_core::contract::AmcContract;
use saral_core::document::FinancialDocument;
use saral_core::numbering::CounterKey;
use saral_core::payment::Payment;
use saral_shared::types::{ContractId, DocumentId, PaymentId};

use crate::error::StoreError;
use crate::traits::{ContractStore, CounterStore, DocumentStore, PaymentStore};

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    counters: DashMap<CounterKey, u64>,
    documents: DashMap<DocumentId, FinancialDocument>,
    payments: DashMap<PaymentId, Payment>,
    contracts: DashMap<ContractId, AmcContract>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryStore {
    async fn next(&self, key: &CounterKey) -> Result<u64, StoreError> {
        // The entry guard holds the shard lock for the whole
        // read-modify-write, making the increment atomic.
        let mut counter = self.counters.entry(*key).or_insert(0);
        *counter += 1;
        tracing::debug!(key = %key, value = *counter, "issued sequence value");
        Ok(*counter)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_document(&self, document: FinancialDocument) -> Result<(), StoreError> {
        match self.documents.entry(document.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                entity: format!("document {}", document.id),
            }),
            Entry::Vacant(slot) => {
                slot.insert(document);
                Ok(())
            }
        }
    }

    async fn get_document(&self, id: DocumentId) -> Result<FinancialDocument, StoreError> {
        self.documents
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("document {id}"),
            })
    }

    async fn update_document(
        &self,
        document: FinancialDocument,
        expected_version: u64,
    ) -> Result<FinancialDocument, StoreError> {
        let id = document.id;
        let mut entry = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("document {id}"),
            })?;

        if entry.version != expected_version {
            tracing::warn!(
                document = %id,
                expected = expected_version,
                actual = entry.version,
                "document update conflict"
            );
            return Err(StoreError::Conflict {
                entity: format!("document {id}"),
                expected: expected_version,
                actual: entry.version,
            });
        }

        let mut updated = document;
        updated.version = expected_version + 1;
        *entry = updated.clone();
        Ok(updated)
    }

    async fn commit_conversion(
        &self,
        quotation: FinancialDocument,
        expected_version: u64,
        invoice: FinancialDocument,
    ) -> Result<FinancialDocument, StoreError> {
        // Insert the invoice first (its fresh id is unknown to any
        // other caller), then conditionally update the quotation;
        // a conflict rolls the insert back so the pair stays atomic.
        let invoice_id = invoice.id;
        self.insert_document(invoice).await?;

        match self.update_document(quotation, expected_version).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                self.documents.remove(&invoice_id);
                Err(err)
            }
        }
    }
}

#[async_trait]
impl PaymentStore for InMemoryStore {
    async fn get_payment(&self, id: PaymentId) -> Result<Payment, StoreError> {
        self.payments
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("payment {id}"),
            })
    }

    async fn payments_for_invoice(
        &self,
        invoice_id: DocumentId,
    ) -> Result<Vec<Payment>, StoreError> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|entry| entry.invoice_id == invoice_id)
            .map(|entry| entry.clone())
            .collect();
        payments.sort_by_key(|p| p.created_at);
        Ok(payments)
    }

    async fn commit_payment(
        &self,
        invoice: FinancialDocument,
        expected_version: u64,
        payment: Payment,
    ) -> Result<FinancialDocument, StoreError> {
        let invoice_id = invoice.id;
        // Lock order: documents, then payments.
        let mut entry = self
            .documents
            .get_mut(&invoice_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("document {invoice_id}"),
            })?;

        if entry.version != expected_version {
            tracing::warn!(
                invoice = %invoice_id,
                expected = expected_version,
                actual = entry.version,
                "payment commit conflict"
            );
            return Err(StoreError::Conflict {
                entity: format!("document {invoice_id}"),
                expected: expected_version,
                actual: entry.version,
            });
        }
        if self.payments.contains_key(&payment.id) {
            return Err(StoreError::Duplicate {
                entity: format!("payment {}", payment.id),
            });
        }

        let mut updated = invoice;
        updated.version = expected_version + 1;
        self.payments.insert(payment.id, payment);
        *entry = updated.clone();
        Ok(updated)
    }

    async fn commit_void(
        &self,
        payment: Payment,
        invoice: FinancialDocument,
        expected_version: u64,
    ) -> Result<FinancialDocument, StoreError> {
        let invoice_id = invoice.id;
        // Same lock order as commit_payment: documents, then payments.
        let mut entry = self
            .documents
            .get_mut(&invoice_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("document {invoice_id}"),
            })?;

        if entry.version != expected_version {
            return Err(StoreError::Conflict {
                entity: format!("document {invoice_id}"),
                expected: expected_version,
                actual: entry.version,
            });
        }

        let mut payment_entry =
            self.payments
                .get_mut(&payment.id)
                .ok_or_else(|| StoreError::NotFound {
                    entity: format!("payment {}", payment.id),
                })?;

        let mut updated = invoice;
        updated.version = expected_version + 1;
        *payment_entry = payment;
        drop(payment_entry);
        *entry = updated.clone();
        Ok(updated)
    }
}

#[async_trait]
impl ContractStore for InMemoryStore {
    async fn insert_contract(&self, contract: AmcContract) -> Result<(), StoreError> {
        match self.contracts.entry(contract.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                entity: format!("contract {}", contract.id),
            }),
            Entry::Vacant(slot) => {
                slot.insert(contract);
                Ok(())
            }
        }
    }

    async fn get_contract(&self, id: ContractId) -> Result<AmcContract, StoreError> {
        self.contracts
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("contract {id}"),
            })
    }

    async fn update_contract(
        &self,
        contract: AmcContract,
        expected_version: u64,
    ) -> Result<AmcContract, StoreError> {
        let id = contract.id;
        let mut entry = self
            .contracts
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("contract {id}"),
            })?;

        if entry.version != expected_version {
            return Err(StoreError::Conflict {
                entity: format!("contract {id}"),
                expected: expected_version,
                actual: entry.version,
            });
        }

        let mut updated = contract;
        updated.version = expected_version + 1;
        *entry = updated.clone();
        Ok(updated)
    }

    async fn commit_renewal(
        &self,
        retired: AmcContract,
        expected_version: u64,
        successor: AmcContract,
    ) -> Result<AmcContract, StoreError> {
        let successor_id = successor.id;
        self.insert_contract(successor).await?;

        match self.update_contract(retired, expected_version).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                self.contracts.remove(&successor_id);
                Err(err)
            }
        }
    }
}
