//! Contract validation, scheduling, activation, and renewal.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;

use saral_shared::types::{ContractId, UserId, VisitId};

use super::error::ContractError;
use super::types::{
    AmcContract, ContractEvent, ContractStatus, CreateContractInput, ScheduledVisit,
    ServiceFrequency, VisitStatus,
};
use crate::numbering::DocumentNumber;

/// Stateless service for AMC contract operations.
pub struct ContractService;

impl ContractService {
    /// Validates contract terms.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidPeriod` unless the end date is
    /// strictly after the start date, or `ContractError::NegativeValue`
    /// for a negative contract value.
    pub fn validate_terms(
        start_date: NaiveDate,
        end_date: NaiveDate,
        contract_value: Decimal,
    ) -> Result<(), ContractError> {
        if end_date <= start_date {
            return Err(ContractError::InvalidPeriod {
                start: start_date,
                end: end_date,
            });
        }
        if contract_value < Decimal::ZERO {
            return Err(ContractError::NegativeValue {
                value: contract_value,
            });
        }
        Ok(())
    }

    /// Generates the visit schedule for a contract period.
    ///
    /// Visits fall due one interval after the start date and repeat
    /// every interval up to and including the end date. All visits
    /// start Pending.
    #[must_use]
    pub fn build_schedule(
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: ServiceFrequency,
    ) -> Vec<ScheduledVisit> {
        let interval = frequency.interval_months();
        let mut visits = Vec::new();
        let mut step = 1u32;
        while let Some(due_date) = start_date.checked_add_months(Months::new(interval * step)) {
            if due_date > end_date {
                break;
            }
            visits.push(ScheduledVisit {
                id: VisitId::new(),
                due_date,
                status: VisitStatus::Pending,
                completed_by: None,
                completed_at: None,
            });
            step += 1;
        }
        visits
    }

    /// Builds a new Draft contract with its visit schedule.
    ///
    /// # Errors
    ///
    /// Returns `ContractError` if the terms fail validation.
    pub fn build(
        number: DocumentNumber,
        input: CreateContractInput,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<AmcContract, ContractError> {
        Self::validate_terms(input.start_date, input.end_date, input.contract_value)?;

        Ok(AmcContract {
            id: ContractId::new(),
            number,
            client_id: input.client_id,
            contract_value: input.contract_value,
            start_date: input.start_date,
            end_date: input.end_date,
            frequency: input.frequency,
            visits: Self::build_schedule(input.start_date, input.end_date, input.frequency),
            status: ContractStatus::Draft,
            renewed_from: None,
            version: 1,
            created_by: actor,
            updated_by: actor,
            created_at: now,
            updated_at: now,
        })
    }

    /// Projects the effective contract status as of `as_of`.
    ///
    /// An Active contract past its end date reports Expired; the
    /// stored status is untouched.
    #[must_use]
    pub fn effective_status(
        stored: ContractStatus,
        end_date: NaiveDate,
        as_of: NaiveDate,
    ) -> ContractStatus {
        match stored {
            ContractStatus::Active if as_of > end_date => ContractStatus::Expired,
            other => other,
        }
    }

    /// Activates a Draft contract.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidTransition` unless the contract
    /// is Draft.
    pub fn activate(
        contract: &AmcContract,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<AmcContract, ContractError> {
        if contract.status != ContractStatus::Draft {
            return Err(ContractError::InvalidTransition {
                from: contract.status,
                event: ContractEvent::Activate,
            });
        }

        let mut updated = contract.clone();
        updated.status = ContractStatus::Active;
        updated.updated_by = actor;
        updated.updated_at = now;
        Ok(updated)
    }

    /// Renews a contract: the original transitions to Renewed and a
    /// successor covering the following period of equal length is
    /// created Active, with a fresh schedule and its own number.
    ///
    /// The guard is on the *stored* status, so a date-expired (projected
    /// Expired) contract can still be renewed.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidTransition` unless the stored
    /// status is Active.
    pub fn renew(
        contract: &AmcContract,
        successor_number: DocumentNumber,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<(AmcContract, AmcContract), ContractError> {
        if contract.status != ContractStatus::Active {
            return Err(ContractError::InvalidTransition {
                from: contract.status,
                event: ContractEvent::Renew,
            });
        }

        let duration = contract.end_date - contract.start_date;
        let start_date = contract.end_date;
        let end_date = contract.end_date + duration;

        let successor = AmcContract {
            id: ContractId::new(),
            number: successor_number,
            client_id: contract.client_id,
            contract_value: contract.contract_value,
            start_date,
            end_date,
            frequency: contract.frequency,
            visits: Self::build_schedule(start_date, end_date, contract.frequency),
            status: ContractStatus::Active,
            renewed_from: Some(contract.id),
            version: 1,
            created_by: actor,
            updated_by: actor,
            created_at: now,
            updated_at: now,
        };

        let mut retired = contract.clone();
        retired.status = ContractStatus::Renewed;
        retired.updated_by = actor;
        retired.updated_at = now;

        Ok((retired, successor))
    }

    /// Marks a Pending visit as Completed.
    ///
    /// Visit completion is independent of contract status.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::VisitNotFound` or
    /// `ContractError::VisitAlreadyCompleted`.
    pub fn complete_visit(
        contract: &AmcContract,
        visit_id: VisitId,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<AmcContract, ContractError> {
        let mut updated = contract.clone();
        let visit = updated
            .visits
            .iter_mut()
            .find(|v| v.id == visit_id)
            .ok_or(ContractError::VisitNotFound { id: visit_id })?;

        if visit.status == VisitStatus::Completed {
            return Err(ContractError::VisitAlreadyCompleted { id: visit_id });
        }

        visit.status = VisitStatus::Completed;
        visit.completed_by = Some(actor);
        visit.completed_at = Some(now);
        updated.updated_by = actor;
        updated.updated_at = now;
        Ok(updated)
    }
}
