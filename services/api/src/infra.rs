use async_trait::async_trait;
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use subsidy_checklist::error::AppError;
use subsidy_checklist::workflows::checklist::{
    apply_generated, ApplicationCore, ApplicationDataSource, ApplicationId, CalculationReport,
    CalculatorError, ChecklistInput, ChecklistItem, ChecklistRepository, ChecklistSnapshot,
    CostStructureRecord, DataSourceError, EligibilityCalculator, EligibilityCheck,
    FinanceStructureRecord, FinancialDeclarations, FormProgress, MergeMode, ObjectRecord,
    RepositoryError, ReviewerUpdate, StoredChecklist,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Portal export of one application plus the calculator results recorded with it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotFile {
    #[serde(default)]
    pub(crate) application_id: Option<String>,
    #[serde(flatten)]
    pub(crate) snapshot: ChecklistSnapshot,
    #[serde(default)]
    pub(crate) eligibility: BTreeMap<EligibilityCheck, CalculationReport>,
}

impl SnapshotFile {
    pub(crate) fn read(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Checks without a recorded result are left out and reported as undetermined.
    pub(crate) fn into_input(self) -> ChecklistInput {
        ChecklistInput {
            snapshot: self.snapshot,
            eligibility: self
                .eligibility
                .into_iter()
                .map(|(check, report)| (check, Ok(report)))
                .collect(),
            degradations: Vec::new(),
        }
    }
}

/// Read-only set of exported applications, keyed by application id.
#[derive(Debug, Default)]
pub(crate) struct SnapshotCatalog {
    entries: HashMap<ApplicationId, SnapshotFile>,
}

impl SnapshotCatalog {
    /// Loads every `*.json` file in `dir`; the file stem is the id unless the file names one.
    pub(crate) fn load_dir(dir: &Path) -> Result<Self, AppError> {
        let mut catalog = Self::default();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let file = SnapshotFile::read(&path)?;
            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();
            let id = ApplicationId(file.application_id.clone().unwrap_or(stem));
            tracing::debug!(application_id = %id, path = %path.display(), "loaded snapshot");
            catalog.entries.insert(id, file);
        }
        tracing::info!(applications = catalog.entries.len(), "snapshot catalog ready");
        Ok(catalog)
    }

    pub(crate) fn insert(&mut self, id: ApplicationId, file: SnapshotFile) {
        self.entries.insert(id, file);
    }

    fn snapshot(&self, id: &ApplicationId) -> Result<&ChecklistSnapshot, DataSourceError> {
        self.entries
            .get(id)
            .map(|file| &file.snapshot)
            .ok_or(DataSourceError::NotFound)
    }

    fn report(
        &self,
        id: &ApplicationId,
        check: EligibilityCheck,
    ) -> Result<CalculationReport, CalculatorError> {
        let file = self
            .entries
            .get(id)
            .ok_or_else(|| CalculatorError::Failed(format!("application {id} not found")))?;
        file.eligibility
            .get(&check)
            .cloned()
            .ok_or_else(|| CalculatorError::Failed(format!("no {check} result recorded")))
    }
}

#[async_trait]
impl ApplicationDataSource for SnapshotCatalog {
    async fn application(&self, id: &ApplicationId) -> Result<ApplicationCore, DataSourceError> {
        Ok(self.snapshot(id)?.application.clone())
    }

    async fn financials(
        &self,
        id: &ApplicationId,
    ) -> Result<FinancialDeclarations, DataSourceError> {
        Ok(self.snapshot(id)?.financials.clone())
    }

    async fn object(&self, id: &ApplicationId) -> Result<ObjectRecord, DataSourceError> {
        Ok(self.snapshot(id)?.object.clone())
    }

    async fn finance_structure(
        &self,
        id: &ApplicationId,
    ) -> Result<FinanceStructureRecord, DataSourceError> {
        Ok(self.snapshot(id)?.finance_structure.clone())
    }

    async fn cost_structure(
        &self,
        id: &ApplicationId,
    ) -> Result<CostStructureRecord, DataSourceError> {
        Ok(self.snapshot(id)?.cost_structure.clone())
    }

    async fn form_progress(&self, id: &ApplicationId) -> Result<Vec<FormProgress>, DataSourceError> {
        Ok(self.snapshot(id)?.form_progress.clone())
    }
}

#[async_trait]
impl EligibilityCalculator for SnapshotCatalog {
    async fn household_income(
        &self,
        id: &ApplicationId,
    ) -> Result<CalculationReport, CalculatorError> {
        self.report(id, EligibilityCheck::HouseholdIncome)
    }

    async fn income_group(
        &self,
        id: &ApplicationId,
        _household_income: &CalculationReport,
    ) -> Result<CalculationReport, CalculatorError> {
        self.report(id, EligibilityCheck::IncomeGroup)
    }

    async fn available_monthly_income(
        &self,
        id: &ApplicationId,
    ) -> Result<CalculationReport, CalculatorError> {
        self.report(id, EligibilityCheck::AvailableMonthlyIncome)
    }

    async fn additional_financial_criteria(
        &self,
        id: &ApplicationId,
        _income_group: &CalculationReport,
    ) -> Result<CalculationReport, CalculatorError> {
        self.report(id, EligibilityCheck::AdditionalFinancialCriteria)
    }

    async fn cross_form_checks(
        &self,
        id: &ApplicationId,
    ) -> Result<CalculationReport, CalculatorError> {
        self.report(id, EligibilityCheck::CrossFormConsistency)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryChecklistRepository {
    records: Arc<Mutex<HashMap<ApplicationId, StoredChecklist>>>,
}

#[async_trait]
impl ChecklistRepository for InMemoryChecklistRepository {
    async fn load(&self, id: &ApplicationId) -> Result<Option<StoredChecklist>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn store_generated(
        &self,
        id: &ApplicationId,
        fresh: Vec<ChecklistItem>,
        mode: MergeMode,
    ) -> Result<StoredChecklist, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let stored = apply_generated(guard.get(id), fresh, mode, Utc::now());
        guard.insert(id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update_item(
        &self,
        id: &ApplicationId,
        item_id: &str,
        update: ReviewerUpdate,
    ) -> Result<ChecklistItem, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let item = stored
            .checklist_items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| RepositoryError::ItemNotFound(item_id.to_string()))?;
        item.apply_review(&update, Utc::now());
        Ok(item.clone())
    }
}
