//! Assembly of the final item list and the merge with the persisted reviewer layer.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::documents::{DocumentTypeId, EvidenceIndex, GENERAL_KEY};
use super::domain::{
    AgentStatus, ApplicantIdentity, ChecklistItem, FormSection, StoredChecklist, SystemStatus,
};
use super::requirements::RequiredDocuments;
use super::validation;

pub const DOCUMENT_COMPLETENESS_ID: &str = "dokumente_vollstaendigkeit";

/// Non-critical upstream source that may fail without aborting generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Financials,
    Object,
    FinanceStructure,
    CostStructure,
    FormProgress,
}

impl DataSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Financials => "finanzdaten",
            Self::Object => "objektdaten",
            Self::FinanceStructure => "finanzierungsstruktur",
            Self::CostStructure => "kostenstruktur",
            Self::FormProgress => "formularstatus",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Financials => "Einkommensangaben",
            Self::Object => "Objektdaten",
            Self::FinanceStructure => "Finanzierungsstruktur",
            Self::CostStructure => "Kostenstruktur",
            Self::FormProgress => "Formularstatus",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source that failed to load and was replaced by defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchDegradation {
    pub source: DataSource,
    pub message: String,
}

/// Item groups in the order they appear on the checklist.
#[derive(Debug, Clone, Default)]
pub struct ChecklistSections {
    pub applicant_items: Vec<ChecklistItem>,
    pub general_items: Vec<ChecklistItem>,
    pub completeness: Vec<ChecklistItem>,
    pub document_completeness: Option<ChecklistItem>,
    pub informational: Vec<ChecklistItem>,
    pub findings: Vec<ChecklistItem>,
    pub loan_caps: Vec<ChecklistItem>,
    pub degradations: Vec<ChecklistItem>,
}

pub fn synthesize(sections: ChecklistSections) -> Vec<ChecklistItem> {
    let ChecklistSections {
        applicant_items,
        general_items,
        completeness,
        document_completeness,
        informational,
        findings,
        loan_caps,
        degradations,
    } = sections;

    applicant_items
        .into_iter()
        .chain(general_items)
        .chain(completeness)
        .chain(document_completeness)
        .chain(informational)
        .chain(findings)
        .chain(loan_caps)
        .chain(degradations)
        .collect()
}

/// Buckets in checklist order: every enumerated applicant, then `general`.
fn buckets(applicants: &[ApplicantIdentity]) -> Vec<(&str, &str)> {
    applicants
        .iter()
        .map(|identity| (identity.key.as_str(), identity.display_name.as_str()))
        .chain(std::iter::once((GENERAL_KEY, "Allgemeine Dokumente")))
        .collect()
}

/// Passes iff every required document in every bucket has at least one uploaded file.
pub fn document_completeness_item(
    required: &RequiredDocuments,
    applicants: &[ApplicantIdentity],
    evidence: &EvidenceIndex<'_>,
) -> ChecklistItem {
    let mut lines = vec!["Übersicht der hochgeladenen Pflichtdokumente:".to_string()];
    let mut missing = Vec::new();

    for (key, label) in buckets(applicants) {
        let documents = required.for_key(key);
        let present = documents
            .iter()
            .filter(|document| evidence.is_satisfied(**document, key))
            .count();
        let files: usize = documents
            .iter()
            .map(|document| evidence.file_count(*document, key))
            .sum();
        lines.push(format!(
            "- {label}: {present} von {} Pflichtdokumenten vorhanden ({files} Dateien)",
            documents.len()
        ));

        missing.extend(
            documents
                .iter()
                .filter(|document| !evidence.is_satisfied(**document, key))
                .map(|document| format!("Dokument fehlt: {} ({label})", document.label())),
        );
    }

    let status = if missing.is_empty() {
        SystemStatus::Correct
    } else {
        SystemStatus::Wrong
    };

    ChecklistItem::new(
        DOCUMENT_COMPLETENESS_ID,
        "Vollständigkeit der Pflichtdokumente",
        status,
    )
    .with_comment(lines.join("\n"))
    .with_errors(missing)
    .with_forms(&[FormSection::Dokumente])
}

/// One `undefined` item per uploaded document type nobody required.
pub fn informational_items(
    required: &RequiredDocuments,
    applicants: &[ApplicantIdentity],
    evidence: &EvidenceIndex<'_>,
) -> Vec<ChecklistItem> {
    let upload_only: BTreeSet<DocumentTypeId> = validation::upload_only_documents().collect();
    let mut items = Vec::new();

    for (key, label) in buckets(applicants) {
        for document in evidence.uploaded_types(key) {
            if upload_only.contains(&document) || required.is_required(key, document) {
                continue;
            }
            items.push(
                ChecklistItem::new(
                    format!("zusatzdokument_{key}_{}", document.as_str()),
                    format!("Zusätzlich hochgeladen: {} ({label})", document.label()),
                    SystemStatus::Undefined,
                )
                .with_comment(
                    "Dieses Dokument wurde hochgeladen, ist nach den Angaben aber nicht \
                     erforderlich. Bitte prüfen Sie, ob es berücksichtigt werden soll.",
                )
                .with_forms(&[FormSection::Dokumente])
                .with_docs(evidence.file_refs(document, key)),
            );
        }
    }

    items
}

pub fn degradation_items(degradations: &[FetchDegradation]) -> Vec<ChecklistItem> {
    degradations
        .iter()
        .map(|degradation| {
            ChecklistItem::new(
                format!("datenquelle_{}", degradation.source.as_str()),
                format!("Datenquelle nicht verfügbar: {}", degradation.source.label()),
                SystemStatus::Wrong,
            )
            .with_comment(
                "Die Daten konnten nicht geladen werden. Die Prüfung wurde mit leeren Angaben \
                 fortgesetzt und ist nach erneuter Generierung zu wiederholen.",
            )
            .with_errors(vec![degradation.message.clone()])
        })
        .collect()
}

/// How persisted items without a fresh counterpart are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    #[default]
    Retain,
    PurgeOrphans,
}

/// Combines fresh system fields with persisted reviewer fields, matched by id.
///
/// Fresh items keep their order; retained orphans follow in persisted order.
pub fn merge(
    fresh: Vec<ChecklistItem>,
    persisted: &[ChecklistItem],
    mode: MergeMode,
) -> Vec<ChecklistItem> {
    let mut previous: BTreeMap<&str, &ChecklistItem> = BTreeMap::new();
    for item in persisted {
        previous.entry(item.id.as_str()).or_insert(item);
    }

    let fresh_ids: BTreeSet<String> = fresh.iter().map(|item| item.id.clone()).collect();

    let mut merged: Vec<ChecklistItem> = fresh
        .into_iter()
        .map(|mut item| {
            match previous.get(item.id.as_str()) {
                Some(earlier) => {
                    item.agent_status = earlier.agent_status;
                    item.agent_notes = earlier.agent_notes.clone();
                    item.status_set_by = earlier.status_set_by.clone();
                }
                None => {
                    item.agent_status = AgentStatus::Undefined;
                    item.agent_notes = None;
                    item.status_set_by = None;
                }
            }
            item
        })
        .collect();

    if mode == MergeMode::Retain {
        let mut seen = BTreeSet::new();
        merged.extend(
            persisted
                .iter()
                .filter(|item| !fresh_ids.contains(&item.id) && seen.insert(item.id.as_str()))
                .cloned(),
        );
    }

    merged
}

/// Stored checklist after merging a fresh machine layer into `persisted`.
///
/// Repositories call this while holding their write lock. An existing status is kept.
pub fn apply_generated(
    persisted: Option<&StoredChecklist>,
    fresh: Vec<ChecklistItem>,
    mode: MergeMode,
    generated_at: DateTime<Utc>,
) -> StoredChecklist {
    let (items, status) = match persisted {
        Some(stored) => (
            merge(fresh, &stored.checklist_items, mode),
            stored.status.clone(),
        ),
        None => (
            merge(fresh, &[], mode),
            StoredChecklist::INITIAL_STATUS.to_string(),
        ),
    };
    StoredChecklist {
        checklist_items: items,
        status,
        generated_at: Some(generated_at),
    }
}
