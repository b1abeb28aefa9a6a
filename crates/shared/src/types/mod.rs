//! Shared domain types.

pub mod id;
pub mod money;

pub use id::{ClientId, ContractId, DocumentId, MutationId, PaymentId, UserId, VisitId};
