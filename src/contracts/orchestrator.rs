use tracing::info;

use super::ContractService;
use crate::cache::{QueryKey, QueryPattern};
use crate::error::{AppError, AppResult};
use crate::models::PLACEHOLDER_MUSICIAN_ID;
use crate::models::contracts::{ContractRef, ContractStatus, GenerateRequest, MonthlyContract};

/// Local checks on a generate scope, before anything reaches the backend.
pub fn validate_scope(request: &GenerateRequest) -> AppResult<()> {
    if request.planner_id <= 0 {
        return Err(AppError::validation("A planner must be selected"));
    }
    if !(1..=12).contains(&request.month) {
        return Err(AppError::validation(format!(
            "Month must be between 1 and 12, got {}",
            request.month
        )));
    }
    if !(2000..=2100).contains(&request.year) {
        return Err(AppError::validation(format!(
            "Year {} is out of range",
            request.year
        )));
    }

    let has_assignments = request
        .assignment_ids
        .as_ref()
        .is_some_and(|ids| !ids.is_empty());

    match request.musician_id {
        Some(PLACEHOLDER_MUSICIAN_ID) => Err(AppError::validation(
            "The placeholder musician cannot receive a contract",
        )),
        Some(id) if id <= 0 => Err(AppError::validation("A musician must be selected")),
        Some(_) if !has_assignments => Err(AppError::validation(
            "Select at least one assignment to include in the contract",
        )),
        None if has_assignments => Err(AppError::validation(
            "Assignments can only be selected for a single musician",
        )),
        _ => Ok(()),
    }
}

impl ContractService {
    /// Create contract(s) for the scope without sending them.
    pub async fn generate(&self, request: &GenerateRequest) -> AppResult<ContractRef> {
        validate_scope(request)?;

        let response = self.api.generate_contracts(request).await?;
        let contract = response
            .contract_ref()
            .ok_or(AppError::MissingContractId {
                planner_id: request.planner_id,
            })?;

        info!(
            "Generated contract {} for planner {} ({}/{})",
            contract.id, request.planner_id, request.month, request.year
        );
        self.cache
            .invalidate(&[QueryPattern::Planner(request.planner_id)])
            .await;
        Ok(contract)
    }

    /// Generate, then send the generated contract.
    ///
    /// The send step never runs without a contract id. If sending fails the
    /// generated contract stays in place and only the planner reads have been
    /// invalidated.
    pub async fn generate_and_send(&self, request: &GenerateRequest) -> AppResult<ContractRef> {
        let contract = self.generate(request).await?;

        self.api.send_contract(contract.id).await?;
        info!("Sent contract {}", contract.id);

        self.cache
            .invalidate(&[
                QueryPattern::Planner(request.planner_id),
                QueryPattern::Contract(contract.id),
            ])
            .await;
        Ok(contract)
    }

    pub async fn send(&self, contract_id: i64) -> AppResult<()> {
        let cached = self
            .check_cached_status(contract_id, &ContractStatus::Sent, |status| {
                status.can_transition_to(&ContractStatus::Sent)
            })
            .await?;

        self.api.send_contract(contract_id).await?;
        info!("Sent contract {contract_id}");
        self.invalidate_contract(contract_id, cached.as_ref()).await;
        Ok(())
    }

    /// Re-deliver a contract the musician has not answered yet.
    pub async fn resend(&self, contract_id: i64) -> AppResult<()> {
        let cached = self
            .check_cached_status(contract_id, &ContractStatus::Sent, |status| {
                matches!(status, ContractStatus::Sent | ContractStatus::NeedsRevision)
            })
            .await?;

        self.api.resend_contract(contract_id).await?;
        info!("Resent contract {contract_id}");
        self.invalidate_contract(contract_id, cached.as_ref()).await;
        Ok(())
    }

    pub async fn cancel(&self, contract_id: i64) -> AppResult<()> {
        let cached = self
            .check_cached_status(contract_id, &ContractStatus::Cancelled, |status| {
                status.can_transition_to(&ContractStatus::Cancelled)
            })
            .await?;

        self.api.cancel_contract(contract_id).await?;
        info!("Cancelled contract {contract_id}");
        self.invalidate_contract(contract_id, cached.as_ref()).await;
        Ok(())
    }

    /// When the contract detail is cached, refuse a forbidden transition
    /// without calling the backend. Without a cached copy the backend decides.
    async fn check_cached_status(
        &self,
        contract_id: i64,
        target: &ContractStatus,
        allowed: impl Fn(&ContractStatus) -> bool,
    ) -> AppResult<Option<MonthlyContract>> {
        let cached: Option<MonthlyContract> = self
            .cache
            .get(&QueryKey::MonthlyContract { contract_id })
            .await;

        if let Some(contract) = &cached {
            if !allowed(&contract.status) {
                return Err(AppError::InvalidTransition {
                    from: contract.status.to_string(),
                    to: target.to_string(),
                });
            }
        }
        Ok(cached)
    }

    async fn invalidate_contract(&self, contract_id: i64, cached: Option<&MonthlyContract>) {
        let mut patterns = vec![
            QueryPattern::Contract(contract_id),
            QueryPattern::AnyMusicianContract,
        ];
        if let Some(contract) = cached {
            patterns.push(QueryPattern::Planner(contract.planner_id));
        }
        self.cache.invalidate(&patterns).await;
    }
}
