//! Checklist generation and document-requirement rules for subsidy applications.
//!
//! Form data is normalized once into an identity-keyed household, evaluated by
//! table-driven requirement and display rules, enriched with calculator findings and
//! merged with the reviewer layer that is already persisted for the application.

pub mod applicants;
pub mod config;
pub mod documents;
pub mod domain;
pub mod engine;
pub mod facts;
pub mod findings;
pub mod income_labels;
pub mod normalizer;
pub mod repository;
pub mod requirements;
pub mod router;
pub mod service;
pub mod synthesis;
pub mod validation;

#[cfg(test)]
mod tests;

pub use config::ChecklistConfig;
pub use documents::{DocumentCategory, DocumentTypeId, EvidenceIndex, GENERAL_KEY};
pub use domain::{
    AgentStatus, ApplicantIdentity, ApplicantRole, ApplicationCore, ApplicationId, ChecklistItem,
    ChecklistSnapshot, CostStructureRecord, FinanceStructureRecord, FinancialDeclarations,
    FinancialRecord, FormNumber, FormProgress, FormSection, ObjectRecord, PersonRecord,
    ReviewerUpdate, StoredChecklist, SystemStatus,
};
pub use engine::{ChecklistGenerator, ChecklistInput};
pub use findings::{CalculationReport, CalculatorError, EligibilityCheck, EligibilityResults};
pub use repository::{
    ApplicationDataSource, ChecklistRepository, DataSourceError, EligibilityCalculator,
    RepositoryError,
};
pub use requirements::RequiredDocuments;
pub use router::checklist_router;
pub use service::{ChecklistService, ChecklistServiceError};
pub use synthesis::{apply_generated, merge, DataSource, FetchDegradation, MergeMode};
