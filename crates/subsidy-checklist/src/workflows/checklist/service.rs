use std::sync::Arc;

use super::config::ChecklistConfig;
use super::domain::{
    ApplicationId, ChecklistItem, ChecklistSnapshot, ReviewerUpdate, StoredChecklist,
};
use super::engine::{ChecklistGenerator, ChecklistInput};
use super::findings::{CalculatorError, EligibilityCheck, EligibilityResults};
use super::repository::{
    ApplicationDataSource, ChecklistRepository, DataSourceError, EligibilityCalculator,
    RepositoryError,
};
use super::synthesis::{DataSource, FetchDegradation, MergeMode};

/// Service composing the upstream sources, the calculator, the generator and storage.
pub struct ChecklistService<D, E, R> {
    sources: Arc<D>,
    calculator: Arc<E>,
    repository: Arc<R>,
    generator: Arc<ChecklistGenerator>,
    default_merge: MergeMode,
}

impl<D, E, R> ChecklistService<D, E, R>
where
    D: ApplicationDataSource + 'static,
    E: EligibilityCalculator + 'static,
    R: ChecklistRepository + 'static,
{
    pub fn new(
        sources: Arc<D>,
        calculator: Arc<E>,
        repository: Arc<R>,
        config: ChecklistConfig,
    ) -> Self {
        Self {
            sources,
            calculator,
            repository,
            generator: Arc::new(ChecklistGenerator::new(config)),
            default_merge: MergeMode::Retain,
        }
    }

    /// Merge mode used when a regeneration request does not choose one.
    pub fn with_default_merge(mut self, mode: MergeMode) -> Self {
        self.default_merge = mode;
        self
    }

    pub fn generator(&self) -> &ChecklistGenerator {
        &self.generator
    }

    /// Stored checklist, generated on first access.
    pub async fn open(&self, id: &ApplicationId) -> Result<StoredChecklist, ChecklistServiceError> {
        match self.repository.load(id).await? {
            Some(stored) => Ok(stored),
            None => self.regenerate(id, None).await,
        }
    }

    /// Recompute the machine layer and merge it into the persisted reviewer layer.
    ///
    /// Nothing is written unless generation completes. The merge itself runs inside the
    /// repository so concurrent reviewer edits survive.
    pub async fn regenerate(
        &self,
        id: &ApplicationId,
        mode: Option<MergeMode>,
    ) -> Result<StoredChecklist, ChecklistServiceError> {
        let mode = mode.unwrap_or(self.default_merge);
        let input = self.collect_input(id).await?;
        let fresh = self.generator.generate(&input);
        let fresh_count = fresh.len();
        let stored = self.repository.store_generated(id, fresh, mode).await?;

        tracing::info!(
            application_id = %id,
            fresh = fresh_count,
            total = stored.checklist_items.len(),
            degraded = input.degradations.len(),
            ?mode,
            "checklist regenerated"
        );
        Ok(stored)
    }

    /// Reviewer edit on one item; never regenerates.
    pub async fn update_item(
        &self,
        id: &ApplicationId,
        item_id: &str,
        update: ReviewerUpdate,
    ) -> Result<ChecklistItem, ChecklistServiceError> {
        if update.reviewer.trim().is_empty() {
            return Err(ChecklistServiceError::MissingReviewer);
        }
        if update.is_empty() {
            return Err(ChecklistServiceError::EmptyUpdate);
        }

        match self.repository.update_item(id, item_id, update).await {
            Ok(item) => {
                tracing::info!(application_id = %id, item_id, "reviewer updated checklist item");
                Ok(item)
            }
            Err(RepositoryError::ItemNotFound(item)) => {
                Err(ChecklistServiceError::ItemNotFound(item))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Fetches every source concurrently; only the core application record is fatal.
    pub async fn collect_input(
        &self,
        id: &ApplicationId,
    ) -> Result<ChecklistInput, ChecklistServiceError> {
        let (
            application,
            financials,
            object,
            finance_structure,
            cost_structure,
            progress,
            eligibility,
        ) = tokio::join!(
            self.sources.application(id),
            self.sources.financials(id),
            self.sources.object(id),
            self.sources.finance_structure(id),
            self.sources.cost_structure(id),
            self.sources.form_progress(id),
            self.eligibility(id),
        );

        let application =
            application.map_err(|source| ChecklistServiceError::ApplicationUnavailable {
                id: id.clone(),
                source,
            })?;

        let mut degradations = Vec::new();
        let snapshot = ChecklistSnapshot {
            application,
            financials: degrade(id, financials, DataSource::Financials, &mut degradations),
            object: degrade(id, object, DataSource::Object, &mut degradations),
            finance_structure: degrade(
                id,
                finance_structure,
                DataSource::FinanceStructure,
                &mut degradations,
            ),
            cost_structure: degrade(
                id,
                cost_structure,
                DataSource::CostStructure,
                &mut degradations,
            ),
            form_progress: degrade(id, progress, DataSource::FormProgress, &mut degradations),
        };

        Ok(ChecklistInput {
            snapshot,
            eligibility,
            degradations,
        })
    }

    /// Household income feeds income group, which feeds the additional criteria; the
    /// two independent checks run alongside that chain.
    async fn eligibility(&self, id: &ApplicationId) -> EligibilityResults {
        let chain = async {
            let household = self.calculator.household_income(id).await;
            let group = match &household {
                Ok(report) => self.calculator.income_group(id, report).await,
                Err(_) => Err(CalculatorError::DependencyFailed {
                    dependency: EligibilityCheck::HouseholdIncome,
                }),
            };
            let additional = match &group {
                Ok(report) => self.calculator.additional_financial_criteria(id, report).await,
                Err(_) => Err(CalculatorError::DependencyFailed {
                    dependency: EligibilityCheck::IncomeGroup,
                }),
            };
            (household, group, additional)
        };

        let ((household, group, additional), available, cross_form) = tokio::join!(
            chain,
            self.calculator.available_monthly_income(id),
            self.calculator.cross_form_checks(id),
        );

        let mut results = EligibilityResults::new();
        for (check, result) in [
            (EligibilityCheck::HouseholdIncome, household),
            (EligibilityCheck::IncomeGroup, group),
            (EligibilityCheck::AvailableMonthlyIncome, available),
            (EligibilityCheck::AdditionalFinancialCriteria, additional),
            (EligibilityCheck::CrossFormConsistency, cross_form),
        ] {
            if let Err(err) = &result {
                tracing::warn!(
                    application_id = %id,
                    %check,
                    error = %err,
                    "eligibility calculation failed"
                );
            }
            results.insert(check, result);
        }
        results
    }
}

fn degrade<T: Default>(
    id: &ApplicationId,
    result: Result<T, DataSourceError>,
    source: DataSource,
    degradations: &mut Vec<FetchDegradation>,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                application_id = %id,
                %source,
                error = %err,
                "data source failed, continuing with defaults"
            );
            degradations.push(FetchDegradation {
                source,
                message: err.to_string(),
            });
            T::default()
        }
    }
}

/// Error raised by the checklist service.
#[derive(Debug, thiserror::Error)]
pub enum ChecklistServiceError {
    #[error("application {id} unavailable: {source}")]
    ApplicationUnavailable {
        id: ApplicationId,
        source: DataSourceError,
    },
    #[error("checklist item '{0}' not found")]
    ItemNotFound(String),
    #[error("reviewer update must name a reviewer")]
    MissingReviewer,
    #[error("reviewer update carries neither a status nor notes")]
    EmptyUpdate,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
