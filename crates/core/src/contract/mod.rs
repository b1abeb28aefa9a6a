//! AMC contracts, visit schedules, and renewal.
//!
//! Contracts carry their own small lifecycle (Draft → Active →
//! Renewed, with Expired projected from the end date at read time)
//! and an ordered schedule of service visits generated from the
//! service frequency. Visit completion is independent of contract
//! status.
//!
//! # Modules
//!
//! - `types` - Contract, visit, and frequency types
//! - `error` - Contract error types
//! - `service` - Validation, scheduling, activation, and renewal

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ContractError;
pub use service::ContractService;
pub use types::{
    AmcContract, ContractEvent, ContractStatus, CreateContractInput, ScheduledVisit,
    ServiceFrequency, VisitStatus,
};
