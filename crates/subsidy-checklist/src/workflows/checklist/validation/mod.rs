//! Display rules that turn required or uploaded documents into reviewable items.
//!
//! Evidence can only fail an item. A present document leaves the status
//! `undefined` because a reviewer still has to confirm its content.

pub mod narrative;
mod rules;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::documents::{DocumentTypeId, EvidenceIndex, GENERAL_KEY};
use super::domain::{ChecklistItem, FormSection, SystemStatus};
use super::facts::{ApplicantFacts, GeneralFacts};

pub(crate) use rules::{ApplicantForms, ApplicantRule, GeneralRule, UploadRule};

use narrative::Narrative;

pub fn generate_applicant_items(
    facts: &ApplicantFacts<'_>,
    evidence: &EvidenceIndex<'_>,
) -> Vec<ChecklistItem> {
    evaluate_applicant_rules(
        facts,
        evidence,
        rules::APPLICANT_RULES,
        rules::APPLICANT_UPLOAD_RULES,
    )
}

pub fn generate_general_items(
    facts: &GeneralFacts<'_>,
    evidence: &EvidenceIndex<'_>,
) -> Vec<ChecklistItem> {
    evaluate_general_rules(
        facts,
        evidence,
        rules::GENERAL_RULES,
        rules::GENERAL_UPLOAD_RULES,
    )
}

/// Document types reported through upload rules rather than requirements.
pub fn upload_only_documents() -> impl Iterator<Item = DocumentTypeId> {
    rules::APPLICANT_UPLOAD_RULES
        .iter()
        .chain(rules::GENERAL_UPLOAD_RULES)
        .map(|rule| rule.document)
}

pub fn applicant_item_id(document: DocumentTypeId, applicant_key: &str) -> String {
    format!("{}_{applicant_key}", document.as_str())
}

pub(crate) fn evaluate_applicant_rules(
    facts: &ApplicantFacts<'_>,
    evidence: &EvidenceIndex<'_>,
    display_rules: &[ApplicantRule],
    upload_rules: &[UploadRule],
) -> Vec<ChecklistItem> {
    let key = facts.identity.key.as_str();
    let suffix = format!(" ({})", facts.identity.display_name);
    let mut items = Vec::new();

    for rule in display_rules {
        let id = applicant_item_id(rule.document, key);
        let title = format!("{}{suffix}", rule.title);
        let outcome = isolate(&id, &title, || {
            if rule.gate.skips(facts.person) || !(rule.applies)(facts) {
                return None;
            }
            let forms = rule.forms.resolve(facts);
            let comment = (rule.narrative)(facts).cross_check(&forms);
            Some(evidence_item(
                id.clone(),
                title.clone(),
                rule.documents(),
                key,
                evidence,
                comment,
                &forms,
            ))
        });
        items.extend(outcome);
    }

    // Upload-only rules share the no-income skip of the income rules.
    if !facts.person.has_no_income {
        for rule in upload_rules {
            let id = applicant_item_id(rule.document, key);
            let title = format!("{}{suffix}", rule.title);
            items.extend(isolate(&id, &title, || {
                upload_item(rule, id.clone(), title.clone(), key, evidence)
            }));
        }
    }

    items
}

pub(crate) fn evaluate_general_rules(
    facts: &GeneralFacts<'_>,
    evidence: &EvidenceIndex<'_>,
    display_rules: &[GeneralRule],
    upload_rules: &[UploadRule],
) -> Vec<ChecklistItem> {
    let mut items = Vec::new();

    for rule in display_rules {
        let id = rule.document.as_str().to_string();
        let outcome = isolate(&id, rule.title, || {
            if !(rule.applies)(facts) {
                return None;
            }
            let comment = (rule.narrative)(facts).cross_check(rule.forms);
            Some(evidence_item(
                id.clone(),
                rule.title.to_string(),
                std::slice::from_ref(&rule.document),
                GENERAL_KEY,
                evidence,
                comment,
                rule.forms,
            ))
        });
        items.extend(outcome);
    }

    for rule in upload_rules {
        let id = rule.document.as_str().to_string();
        items.extend(isolate(&id, rule.title, || {
            upload_item(rule, id.clone(), rule.title.to_string(), GENERAL_KEY, evidence)
        }));
    }

    items
}

fn evidence_item(
    id: String,
    title: String,
    documents: &[DocumentTypeId],
    key: &str,
    evidence: &EvidenceIndex<'_>,
    comment: String,
    forms: &[FormSection],
) -> ChecklistItem {
    let missing: Vec<String> = documents
        .iter()
        .filter(|document| !evidence.is_satisfied(**document, key))
        .map(|document| format!("Dokument fehlt: {}", document.label()))
        .collect();
    let status = if missing.is_empty() {
        SystemStatus::Undefined
    } else {
        SystemStatus::Wrong
    };

    ChecklistItem::new(id, title, status)
        .with_comment(comment)
        .with_errors(missing)
        .with_forms(forms)
        .with_docs(linked_docs(documents, key, evidence))
}

fn upload_item(
    rule: &UploadRule,
    id: String,
    title: String,
    key: &str,
    evidence: &EvidenceIndex<'_>,
) -> Option<ChecklistItem> {
    let uploaded = evidence.file_count(rule.document, key);
    if uploaded == 0 {
        return None;
    }

    let comment = Narrative::new(rule.intro)
        .field("Hochgeladene Dateien", uploaded.to_string())
        .cross_check(rule.forms);

    Some(
        ChecklistItem::new(id, title, SystemStatus::Undefined)
            .with_comment(comment)
            .with_forms(rule.forms)
            .with_docs(evidence.file_refs(rule.document, key)),
    )
}

/// File references across `documents`, or the bare type ids when nothing was uploaded.
fn linked_docs(documents: &[DocumentTypeId], key: &str, evidence: &EvidenceIndex<'_>) -> Vec<String> {
    let refs: Vec<String> = documents
        .iter()
        .flat_map(|document| evidence.file_refs(*document, key))
        .collect();
    if refs.is_empty() {
        documents
            .iter()
            .map(|document| document.as_str().to_string())
            .collect()
    } else {
        refs
    }
}

/// Runs one rule so that a panic degrades to a `wrong` item instead of aborting the batch.
fn isolate<F>(id: &str, title: &str, rule: F) -> Option<ChecklistItem>
where
    F: FnOnce() -> Option<ChecklistItem>,
{
    match panic::catch_unwind(AssertUnwindSafe(rule)) {
        Ok(item) => item,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(item_id = id, %message, "checklist rule panicked");
            Some(
                ChecklistItem::new(id, title, SystemStatus::Wrong).with_errors(vec![format!(
                    "Regel konnte nicht ausgewertet werden: {message}"
                )]),
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
