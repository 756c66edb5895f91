use async_trait::async_trait;

use super::domain::{
    ApplicationCore, ApplicationId, ChecklistItem, CostStructureRecord, FinanceStructureRecord,
    FinancialDeclarations, FormProgress, ObjectRecord, ReviewerUpdate, StoredChecklist,
};
use super::findings::{CalculationReport, CalculatorError};
use super::synthesis::MergeMode;

/// Key-value checklist storage keyed by application id.
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    async fn load(&self, id: &ApplicationId) -> Result<Option<StoredChecklist>, RepositoryError>;

    /// Merges a freshly generated machine layer into the stored checklist.
    ///
    /// Read, merge and write happen as one atomic step, so a reviewer edit committed
    /// while the checklist was being generated is merged rather than overwritten.
    /// Implementations build the result with [`super::synthesis::apply_generated`].
    async fn store_generated(
        &self,
        id: &ApplicationId,
        fresh: Vec<ChecklistItem>,
        mode: MergeMode,
    ) -> Result<StoredChecklist, RepositoryError>;

    /// Applies a reviewer edit to a single item, last writer wins.
    async fn update_item(
        &self,
        id: &ApplicationId,
        item_id: &str,
        update: ReviewerUpdate,
    ) -> Result<ChecklistItem, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("checklist not found")]
    NotFound,
    #[error("checklist item '{0}' not found")]
    ItemNotFound(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Upstream form data the checklist is generated from.
///
/// Only [`ApplicationDataSource::application`] is critical; every other source may
/// fail and is replaced by defaults.
#[async_trait]
pub trait ApplicationDataSource: Send + Sync {
    async fn application(&self, id: &ApplicationId) -> Result<ApplicationCore, DataSourceError>;
    async fn financials(&self, id: &ApplicationId)
        -> Result<FinancialDeclarations, DataSourceError>;
    async fn object(&self, id: &ApplicationId) -> Result<ObjectRecord, DataSourceError>;
    async fn finance_structure(
        &self,
        id: &ApplicationId,
    ) -> Result<FinanceStructureRecord, DataSourceError>;
    async fn cost_structure(&self, id: &ApplicationId)
        -> Result<CostStructureRecord, DataSourceError>;
    async fn form_progress(&self, id: &ApplicationId) -> Result<Vec<FormProgress>, DataSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("application not found")]
    NotFound,
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// External eligibility arithmetic. Results are consumed verbatim.
#[async_trait]
pub trait EligibilityCalculator: Send + Sync {
    async fn household_income(
        &self,
        id: &ApplicationId,
    ) -> Result<CalculationReport, CalculatorError>;

    async fn income_group(
        &self,
        id: &ApplicationId,
        household_income: &CalculationReport,
    ) -> Result<CalculationReport, CalculatorError>;

    async fn available_monthly_income(
        &self,
        id: &ApplicationId,
    ) -> Result<CalculationReport, CalculatorError>;

    async fn additional_financial_criteria(
        &self,
        id: &ApplicationId,
        income_group: &CalculationReport,
    ) -> Result<CalculationReport, CalculatorError>;

    async fn cross_form_checks(
        &self,
        id: &ApplicationId,
    ) -> Result<CalculationReport, CalculatorError>;
}
