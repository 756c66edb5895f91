use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::checklist::documents::DocumentTypeId;
use crate::workflows::checklist::domain::{
    ApplicationCore, ApplicationId, ChecklistItem, ChecklistSnapshot, CostStructureRecord,
    DocumentStore, FinanceStructureRecord, FinancialDeclarations, FinancialRecord, FormNumber,
    FormProgress, FoerderVariante, ObjectRecord, PersonCollection, PersonRecord, ReviewerUpdate,
    StoredChecklist, SystemStatus, UploadedFile,
};
use crate::workflows::checklist::engine::{ChecklistGenerator, ChecklistInput};
use crate::workflows::checklist::findings::{
    CalculationReport, CalculatorError, EligibilityCheck, EligibilityResults,
};
use crate::workflows::checklist::repository::{
    ApplicationDataSource, ChecklistRepository, DataSourceError, EligibilityCalculator,
    RepositoryError,
};
use crate::workflows::checklist::synthesis::{apply_generated, DataSource, MergeMode};
use crate::workflows::checklist::{ChecklistConfig, ChecklistService};

pub(super) fn application_id() -> ApplicationId {
    ApplicationId("wfa-2024-0815".to_string())
}

pub(super) fn person(id: &str, first: &str, last: &str) -> PersonRecord {
    PersonRecord {
        id: Some(id.to_string()),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        ..PersonRecord::default()
    }
}

/// `uploaded` files flagged as uploaded followed by `pending` placeholder entries.
pub(super) fn files(uploaded: usize, pending: usize) -> Vec<UploadedFile> {
    let mut entries: Vec<UploadedFile> = (0..uploaded)
        .map(|index| UploadedFile {
            uploaded: true,
            file_name: Some(format!("scan-{index}.pdf")),
            storage_path: Some(format!("uploads/scan-{index}.pdf")),
            uploaded_at: None,
        })
        .collect();
    entries.extend((0..pending).map(|_| UploadedFile::default()));
    entries
}

pub(super) fn upload(snapshot: &mut ChecklistSnapshot, key: &str, document: DocumentTypeId, count: usize) {
    snapshot
        .application
        .documents
        .0
        .entry(key.to_string())
        .or_default()
        .insert(document.as_str().to_string(), files(count, 0));
}

/// Main applicant only, new build on an owned plot, nothing declared.
pub(super) fn new_build_snapshot() -> ChecklistSnapshot {
    ChecklistSnapshot {
        application: ApplicationCore {
            main_applicant: person("main-1", "Hanna", "Schulte"),
            additional_applicants: PersonCollection::Keyed(BTreeMap::new()),
            child_count: 0,
            documents: DocumentStore::default(),
        },
        financials: FinancialDeclarations::default(),
        object: ObjectRecord {
            foerder_variante: Some(FoerderVariante::Neubau),
            eigentumsverhaeltnis: true,
            ..ObjectRecord::default()
        },
        finance_structure: FinanceStructureRecord::default(),
        cost_structure: CostStructureRecord::default(),
        form_progress: vec![FormProgress {
            form: crate::workflows::checklist::domain::FormSection::Hauptantrag,
            percent: 100,
        }],
    }
}

pub(super) fn with_rent_income(mut snapshot: ChecklistSnapshot) -> ChecklistSnapshot {
    snapshot.financials.main = FinancialRecord {
        has_rent_income: true,
        income_rent: FormNumber::new(1200.0),
        income_rent_year: FormNumber::new(2023.0),
        ..FinancialRecord::default()
    };
    snapshot
}

/// One excluded member and one member without income but with a disability grade of 60.
pub(super) fn mixed_household_snapshot() -> ChecklistSnapshot {
    let mut snapshot = new_build_snapshot();

    let mut excluded = person("p-excluded", "Erik", "Lang");
    excluded.excluded_from_household = true;
    let mut no_income = person("p-care", "Greta", "Lang");
    no_income.has_no_income = true;
    no_income.disability_grade = FormNumber::new(60.0);

    let mut persons = BTreeMap::new();
    persons.insert("p-excluded".to_string(), excluded);
    persons.insert("p-care".to_string(), no_income);
    snapshot.application.additional_applicants = PersonCollection::Keyed(persons);

    let mut financials = BTreeMap::new();
    financials.insert(
        "p-excluded".to_string(),
        FinancialRecord {
            has_salary_income: true,
            income_salary: FormNumber::new(3100.0),
            ..FinancialRecord::default()
        },
    );
    financials.insert(
        "p-care".to_string(),
        FinancialRecord {
            has_salary_income: true,
            has_pension_income: true,
            ..FinancialRecord::default()
        },
    );
    snapshot.financials.additional =
        crate::workflows::checklist::domain::FinancialCollection::Keyed(financials);
    snapshot
}

pub(super) fn input(snapshot: ChecklistSnapshot) -> ChecklistInput {
    ChecklistInput {
        snapshot,
        eligibility: EligibilityResults::new(),
        degradations: Vec::new(),
    }
}

pub(super) fn generator() -> ChecklistGenerator {
    ChecklistGenerator::new(ChecklistConfig::default())
}

pub(super) fn item<'a>(items: &'a [ChecklistItem], id: &str) -> &'a ChecklistItem {
    items
        .iter()
        .find(|item| item.id == id)
        .unwrap_or_else(|| panic!("missing item {id}"))
}

pub(super) fn ids(items: &[ChecklistItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

pub(super) fn report(lines: &[&str]) -> CalculationReport {
    CalculationReport {
        calculations: lines.iter().map(|line| line.to_string()).collect(),
        ..CalculationReport::default()
    }
}

// Collaborator doubles.

#[derive(Default)]
pub(super) struct FixtureSource {
    snapshots: Mutex<HashMap<ApplicationId, ChecklistSnapshot>>,
    failing: Mutex<BTreeSet<DataSource>>,
    application_down: Mutex<bool>,
}

impl FixtureSource {
    pub(super) fn with(id: &ApplicationId, snapshot: ChecklistSnapshot) -> Self {
        let source = Self::default();
        source.replace(id, snapshot);
        source
    }

    pub(super) fn replace(&self, id: &ApplicationId, snapshot: ChecklistSnapshot) {
        self.snapshots
            .lock()
            .expect("source mutex poisoned")
            .insert(id.clone(), snapshot);
    }

    pub(super) fn fail(&self, source: DataSource) {
        self.failing
            .lock()
            .expect("source mutex poisoned")
            .insert(source);
    }

    pub(super) fn take_application_down(&self) {
        *self.application_down.lock().expect("source mutex poisoned") = true;
    }

    fn read<T>(
        &self,
        id: &ApplicationId,
        source: Option<DataSource>,
        pick: impl FnOnce(&ChecklistSnapshot) -> T,
    ) -> Result<T, DataSourceError> {
        if let Some(source) = source {
            if self
                .failing
                .lock()
                .expect("source mutex poisoned")
                .contains(&source)
            {
                return Err(DataSourceError::Unavailable(format!("{source} offline")));
            }
        }
        let snapshots = self.snapshots.lock().expect("source mutex poisoned");
        snapshots.get(id).map(pick).ok_or(DataSourceError::NotFound)
    }
}

#[async_trait]
impl ApplicationDataSource for FixtureSource {
    async fn application(&self, id: &ApplicationId) -> Result<ApplicationCore, DataSourceError> {
        if *self.application_down.lock().expect("source mutex poisoned") {
            return Err(DataSourceError::Unavailable("core records offline".to_string()));
        }
        self.read(id, None, |snapshot| snapshot.application.clone())
    }

    async fn financials(
        &self,
        id: &ApplicationId,
    ) -> Result<FinancialDeclarations, DataSourceError> {
        self.read(id, Some(DataSource::Financials), |snapshot| {
            snapshot.financials.clone()
        })
    }

    async fn object(&self, id: &ApplicationId) -> Result<ObjectRecord, DataSourceError> {
        self.read(id, Some(DataSource::Object), |snapshot| snapshot.object.clone())
    }

    async fn finance_structure(
        &self,
        id: &ApplicationId,
    ) -> Result<FinanceStructureRecord, DataSourceError> {
        self.read(id, Some(DataSource::FinanceStructure), |snapshot| {
            snapshot.finance_structure.clone()
        })
    }

    async fn cost_structure(
        &self,
        id: &ApplicationId,
    ) -> Result<CostStructureRecord, DataSourceError> {
        self.read(id, Some(DataSource::CostStructure), |snapshot| {
            snapshot.cost_structure.clone()
        })
    }

    async fn form_progress(
        &self,
        id: &ApplicationId,
    ) -> Result<Vec<FormProgress>, DataSourceError> {
        self.read(id, Some(DataSource::FormProgress), |snapshot| {
            snapshot.form_progress.clone()
        })
    }
}

/// Calculator returning canned reports; checks without a canned report fail.
#[derive(Default)]
pub(super) struct FixtureCalculator {
    reports: BTreeMap<EligibilityCheck, CalculationReport>,
    calls: Mutex<Vec<EligibilityCheck>>,
}

impl FixtureCalculator {
    pub(super) fn passing() -> Self {
        let reports = EligibilityCheck::ordered()
            .into_iter()
            .map(|check| (check, report(&[check.title()])))
            .collect();
        Self {
            reports,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn without(mut self, check: EligibilityCheck) -> Self {
        self.reports.remove(&check);
        self
    }

    pub(super) fn calls(&self) -> Vec<EligibilityCheck> {
        self.calls.lock().expect("calculator mutex poisoned").clone()
    }

    fn answer(&self, check: EligibilityCheck) -> Result<CalculationReport, CalculatorError> {
        self.calls
            .lock()
            .expect("calculator mutex poisoned")
            .push(check);
        self.reports
            .get(&check)
            .cloned()
            .ok_or_else(|| CalculatorError::Failed(format!("{check} not available")))
    }
}

#[async_trait]
impl EligibilityCalculator for FixtureCalculator {
    async fn household_income(
        &self,
        _id: &ApplicationId,
    ) -> Result<CalculationReport, CalculatorError> {
        self.answer(EligibilityCheck::HouseholdIncome)
    }

    async fn income_group(
        &self,
        _id: &ApplicationId,
        _household_income: &CalculationReport,
    ) -> Result<CalculationReport, CalculatorError> {
        self.answer(EligibilityCheck::IncomeGroup)
    }

    async fn available_monthly_income(
        &self,
        _id: &ApplicationId,
    ) -> Result<CalculationReport, CalculatorError> {
        self.answer(EligibilityCheck::AvailableMonthlyIncome)
    }

    async fn additional_financial_criteria(
        &self,
        _id: &ApplicationId,
        _income_group: &CalculationReport,
    ) -> Result<CalculationReport, CalculatorError> {
        self.answer(EligibilityCheck::AdditionalFinancialCriteria)
    }

    async fn cross_form_checks(
        &self,
        _id: &ApplicationId,
    ) -> Result<CalculationReport, CalculatorError> {
        self.answer(EligibilityCheck::CrossFormConsistency)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, StoredChecklist>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &ApplicationId) -> Option<StoredChecklist> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn save_count(&self) -> usize {
        *self.saves.lock().expect("repository mutex poisoned")
    }
}

#[async_trait]
impl ChecklistRepository for MemoryRepository {
    async fn load(&self, id: &ApplicationId) -> Result<Option<StoredChecklist>, RepositoryError> {
        Ok(self.stored(id))
    }

    async fn store_generated(
        &self,
        id: &ApplicationId,
        fresh: Vec<ChecklistItem>,
        mode: MergeMode,
    ) -> Result<StoredChecklist, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = apply_generated(guard.get(id), fresh, mode, Utc::now());
        guard.insert(id.clone(), stored.clone());
        *self.saves.lock().expect("repository mutex poisoned") += 1;
        Ok(stored)
    }

    async fn update_item(
        &self,
        id: &ApplicationId,
        item_id: &str,
        update: ReviewerUpdate,
    ) -> Result<ChecklistItem, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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

/// Reads succeed, every write fails.
#[derive(Default)]
pub(super) struct ReadOnlyRepository {
    pub(super) inner: MemoryRepository,
}

#[async_trait]
impl ChecklistRepository for ReadOnlyRepository {
    async fn load(&self, id: &ApplicationId) -> Result<Option<StoredChecklist>, RepositoryError> {
        self.inner.load(id).await
    }

    async fn store_generated(
        &self,
        _id: &ApplicationId,
        _fresh: Vec<ChecklistItem>,
        _mode: MergeMode,
    ) -> Result<StoredChecklist, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    async fn update_item(
        &self,
        _id: &ApplicationId,
        _item_id: &str,
        _update: ReviewerUpdate,
    ) -> Result<ChecklistItem, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

/// Commits a reviewer edit right before each generated layer is stored, the way a
/// reviewer working while the checklist is regenerated would.
pub(super) struct ConcurrentReviewRepository {
    pub(super) inner: MemoryRepository,
    pub(super) item_id: String,
    pub(super) update: ReviewerUpdate,
}

#[async_trait]
impl ChecklistRepository for ConcurrentReviewRepository {
    async fn load(&self, id: &ApplicationId) -> Result<Option<StoredChecklist>, RepositoryError> {
        self.inner.load(id).await
    }

    async fn store_generated(
        &self,
        id: &ApplicationId,
        fresh: Vec<ChecklistItem>,
        mode: MergeMode,
    ) -> Result<StoredChecklist, RepositoryError> {
        if self.inner.stored(id).is_some() {
            self.inner
                .update_item(id, &self.item_id, self.update.clone())
                .await?;
        }
        self.inner.store_generated(id, fresh, mode).await
    }

    async fn update_item(
        &self,
        id: &ApplicationId,
        item_id: &str,
        update: ReviewerUpdate,
    ) -> Result<ChecklistItem, RepositoryError> {
        self.inner.update_item(id, item_id, update).await
    }
}

pub(super) type FixtureService = ChecklistService<FixtureSource, FixtureCalculator, MemoryRepository>;

pub(super) fn build_service(
    snapshot: ChecklistSnapshot,
) -> (FixtureService, Arc<FixtureSource>, Arc<MemoryRepository>) {
    let source = Arc::new(FixtureSource::with(&application_id(), snapshot));
    let repository = Arc::new(MemoryRepository::default());
    let service = ChecklistService::new(
        source.clone(),
        Arc::new(FixtureCalculator::passing()),
        repository.clone(),
        ChecklistConfig::default(),
    );
    (service, source, repository)
}

pub(super) fn reviewer(status: crate::workflows::checklist::AgentStatus) -> ReviewerUpdate {
    ReviewerUpdate {
        reviewer: "sachbearbeitung@bewilligungsstelle".to_string(),
        agent_status: Some(status),
        agent_notes: Some("Nachweis gesichtet".to_string()),
    }
}

pub(super) fn wrong_ids(items: &[ChecklistItem]) -> Vec<&str> {
    items
        .iter()
        .filter(|item| item.system_status == SystemStatus::Wrong)
        .map(|item| item.id.as_str())
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
