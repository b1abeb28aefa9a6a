//! Contract operations: creation, activation, renewal, visits,
//! projected reads.

use chrono::Utc;

use saral_core::contract::{AmcContract, ContractService, CreateContractInput};
use saral_core::numbering::{DocumentNumber, SequenceKind};
use saral_shared::types::{ContractId, UserId, VisitId};
use saral_store::{ContractStore, CounterStore, DocumentStore, PaymentStore};

use crate::error::EngineResult;
use crate::types::{ContractRenewal, ContractView};
use crate::Engine;

impl<S> Engine<S>
where
    S: CounterStore + DocumentStore + PaymentStore + ContractStore,
{
    /// Creates a Draft AMC contract with its visit schedule and a
    /// freshly issued number.
    #[tracing::instrument(skip(self, input, actor))]
    pub async fn create_contract(
        &self,
        input: CreateContractInput,
        actor: UserId,
    ) -> EngineResult<AmcContract> {
        // Validate terms before drawing a number.
        ContractService::validate_terms(input.start_date, input.end_date, input.contract_value)?;

        let number = self
            .next_number(SequenceKind::Contract, input.start_date)
            .await?;
        let contract = ContractService::build(number, input, actor, Utc::now())?;

        self.store_call(self.store().insert_contract(contract.clone()))
            .await?;
        tracing::debug!(contract = %contract.id, number = %contract.number, "contract created");
        Ok(contract)
    }

    /// Activates a Draft contract.
    #[tracing::instrument(skip(self, actor), fields(contract = %contract_id))]
    pub async fn activate_contract(
        &self,
        contract_id: ContractId,
        actor: UserId,
    ) -> EngineResult<AmcContract> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.try_activate_contract(contract_id, actor).await {
                Err(err) if err.is_conflict() && attempts <= self.max_conflict_retries() => {
                    tracing::warn!(contract = %contract_id, attempts, "activate conflict, retrying");
                }
                Err(err) if err.is_conflict() => return Err(err.with_attempts(attempts)),
                other => return other,
            }
        }
    }

    async fn try_activate_contract(
        &self,
        contract_id: ContractId,
        actor: UserId,
    ) -> EngineResult<AmcContract> {
        let contract = self
            .store_call(self.store().get_contract(contract_id))
            .await?;
        let activated = ContractService::activate(&contract, actor, Utc::now())?;
        self.store_call(self.store().update_contract(activated, contract.version))
            .await
    }

    /// Renews a contract: the original is retired as Renewed and an
    /// Active successor covering the following period is created under
    /// a fresh number. Both writes commit atomically.
    ///
    /// Renewal guards on the *stored* Active status, so a date-expired
    /// contract can still be renewed.
    #[tracing::instrument(skip(self, actor), fields(contract = %contract_id))]
    pub async fn renew_contract(
        &self,
        contract_id: ContractId,
        actor: UserId,
    ) -> EngineResult<ContractRenewal> {
        // Minted once, reused across retries, never reclaimed.
        let mut successor_number: Option<DocumentNumber> = None;
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self
                .try_renew_contract(contract_id, actor, &mut successor_number)
                .await
            {
                Err(err) if err.is_conflict() && attempts <= self.max_conflict_retries() => {
                    tracing::warn!(contract = %contract_id, attempts, "renewal conflict, retrying");
                }
                Err(err) if err.is_conflict() => return Err(err.with_attempts(attempts)),
                other => return other,
            }
        }
    }

    async fn try_renew_contract(
        &self,
        contract_id: ContractId,
        actor: UserId,
        successor_number: &mut Option<DocumentNumber>,
    ) -> EngineResult<ContractRenewal> {
        let contract = self
            .store_call(self.store().get_contract(contract_id))
            .await?;

        let number = match successor_number {
            Some(number) => number.clone(),
            None => {
                let minted = self
                    .next_number(SequenceKind::Contract, contract.end_date)
                    .await?;
                *successor_number = Some(minted.clone());
                minted
            }
        };

        let (retired, successor) =
            ContractService::renew(&contract, number, actor, Utc::now())?;

        let saved_retired = self
            .store_call(self.store().commit_renewal(
                retired,
                contract.version,
                successor.clone(),
            ))
            .await?;
        tracing::debug!(
            contract = %contract_id,
            successor = %successor.id,
            number = %successor.number,
            "contract renewed"
        );
        Ok(ContractRenewal {
            retired: saved_retired,
            successor,
        })
    }

    /// Marks a scheduled visit as completed.
    #[tracing::instrument(skip(self, actor), fields(contract = %contract_id, visit = %visit_id))]
    pub async fn complete_visit(
        &self,
        contract_id: ContractId,
        visit_id: VisitId,
        actor: UserId,
    ) -> EngineResult<AmcContract> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.try_complete_visit(contract_id, visit_id, actor).await {
                Err(err) if err.is_conflict() && attempts <= self.max_conflict_retries() => {
                    tracing::warn!(contract = %contract_id, attempts, "visit conflict, retrying");
                }
                Err(err) if err.is_conflict() => return Err(err.with_attempts(attempts)),
                other => return other,
            }
        }
    }

    async fn try_complete_visit(
        &self,
        contract_id: ContractId,
        visit_id: VisitId,
        actor: UserId,
    ) -> EngineResult<AmcContract> {
        let contract = self
            .store_call(self.store().get_contract(contract_id))
            .await?;
        let updated = ContractService::complete_visit(&contract, visit_id, actor, Utc::now())?;
        self.store_call(self.store().update_contract(updated, contract.version))
            .await
    }

    /// Loads a contract with its projected status. A renewal drawn up
    /// for a date-expired contract still works because the guard is on
    /// stored state; this read is how callers see the expiry.
    #[tracing::instrument(skip(self), fields(contract = %contract_id))]
    pub async fn get_contract(&self, contract_id: ContractId) -> EngineResult<ContractView> {
        let contract = self
            .store_call(self.store().get_contract(contract_id))
            .await?;
        let effective_status =
            ContractService::effective_status(contract.status, contract.end_date, Self::today());
        Ok(ContractView {
            contract,
            effective_status,
        })
    }
}
