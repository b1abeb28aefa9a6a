//! Contract domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use saral_shared::types::{ClientId, ContractId, UserId, VisitId};

use crate::numbering::DocumentNumber;

/// AMC contract status.
///
/// Valid transitions (initial state is always Draft):
/// - Draft → Active (activate)
/// - Active → Renewed (renew; a successor contract is created)
///
/// Expired is never stored: an Active contract past its end date
/// reports Expired at read time via projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Being drafted.
    Draft,
    /// In force.
    Active,
    /// End date elapsed (computed).
    Expired,
    /// Superseded by a renewal (terminal).
    Renewed,
}

impl ContractStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Renewed => "renewed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            "renewed" => Some(Self::Renewed),
            _ => None,
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events that drive contract transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractEvent {
    /// Bring the contract into force.
    Activate,
    /// Create a successor contract and retire this one.
    Renew,
}

impl fmt::Display for ContractEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Activate => "activate",
            Self::Renew => "renew",
        };
        write!(f, "{s}")
    }
}

/// How often service visits fall due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceFrequency {
    /// Every month.
    Monthly,
    /// Every three months.
    Quarterly,
    /// Every six months.
    HalfYearly,
    /// Once a year.
    Yearly,
}

impl ServiceFrequency {
    /// Interval between visits, in months.
    #[must_use]
    pub const fn interval_months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::HalfYearly => 6,
            Self::Yearly => 12,
        }
    }

    /// Returns the string representation of the frequency.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::HalfYearly => "half_yearly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for ServiceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Completion state of one scheduled visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    /// Not yet carried out.
    Pending,
    /// Carried out.
    Completed,
}

/// One scheduled service visit under a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledVisit {
    /// Unique identifier.
    pub id: VisitId,
    /// When the visit falls due.
    pub due_date: NaiveDate,
    /// Pending or Completed.
    pub status: VisitStatus,
    /// Who completed the visit, if completed.
    pub completed_by: Option<UserId>,
    /// When the visit was completed, if completed.
    pub completed_at: Option<DateTime<Utc>>,
}

/// An annual maintenance contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmcContract {
    /// Unique identifier.
    pub id: ContractId,
    /// Contract number; assigned once, never reused.
    pub number: DocumentNumber,
    /// Owning client (one-way reference).
    pub client_id: ClientId,
    /// Contract value (>= 0).
    pub contract_value: Decimal,
    /// First day in force.
    pub start_date: NaiveDate,
    /// Last day in force; strictly after `start_date`.
    pub end_date: NaiveDate,
    /// Visit cadence.
    pub frequency: ServiceFrequency,
    /// Ordered visit schedule.
    pub visits: Vec<ScheduledVisit>,
    /// Stored status; reads go through projection for Expired.
    pub status: ContractStatus,
    /// Contract this one renewed, if any (one-way reference).
    pub renewed_from: Option<ContractId>,
    /// Optimistic concurrency token, managed by the store.
    pub version: u64,
    /// User who created the contract.
    pub created_by: UserId,
    /// User who last mutated the contract.
    pub updated_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl AmcContract {
    /// Number of visits still pending.
    #[must_use]
    pub fn pending_visits(&self) -> usize {
        self.visits
            .iter()
            .filter(|v| v.status == VisitStatus::Pending)
            .count()
    }
}

/// Input for creating a contract.
#[derive(Debug, Clone)]
pub struct CreateContractInput {
    /// Owning client.
    pub client_id: ClientId,
    /// Contract value (>= 0).
    pub contract_value: Decimal,
    /// First day in force.
    pub start_date: NaiveDate,
    /// Last day in force; strictly after `start_date`.
    pub end_date: NaiveDate,
    /// Visit cadence.
    pub frequency: ServiceFrequency,
}
