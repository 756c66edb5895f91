mod rules;

use std::collections::BTreeMap;

use serde::Serialize;

use super::config::ChecklistConfig;
use super::documents::{DocumentTypeId, GENERAL_KEY};
use super::domain::{ApplicantIdentity, ApplicantRole};
use super::facts::{ApplicantFacts, GeneralFacts};
use super::normalizer::NormalizedHousehold;

pub(crate) use rules::{ApplicantRequirement, GeneralRequirement};

/// Mandatory document types split by storage bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequiredDocuments {
    pub general: Vec<DocumentTypeId>,
    pub main: Vec<DocumentTypeId>,
    /// Keyed by applicant key (`additional:<personId>`).
    pub additional: BTreeMap<String, Vec<DocumentTypeId>>,
}

impl RequiredDocuments {
    /// Required types for a bucket key (`general`, `main` or an additional applicant key).
    pub fn for_key(&self, key: &str) -> &[DocumentTypeId] {
        if key == GENERAL_KEY {
            return &self.general;
        }
        if key == super::normalizer::MAIN_KEY {
            return &self.main;
        }
        self.additional.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_required(&self, key: &str, document: DocumentTypeId) -> bool {
        self.for_key(key).contains(&document)
    }
}

/// Inputs for requirement determination.
pub struct RequirementContext<'a> {
    pub household: &'a NormalizedHousehold,
    pub applicants: &'a [ApplicantIdentity],
    pub general: GeneralFacts<'a>,
    pub config: &'a ChecklistConfig,
}

pub fn determine_required(context: &RequirementContext<'_>) -> RequiredDocuments {
    let mut required = RequiredDocuments {
        general: general_requirements(&context.general, rules::GENERAL_REQUIREMENTS),
        ..RequiredDocuments::default()
    };

    for identity in context.applicants {
        let Some(facts) = ApplicantFacts::resolve(context.household, identity, context.config)
        else {
            continue;
        };
        let documents = applicant_requirements(&facts, rules::APPLICANT_REQUIREMENTS);

        match identity.role {
            ApplicantRole::Main => required.main = documents,
            ApplicantRole::Additional => {
                required.additional.insert(identity.key.clone(), documents);
            }
        }
    }

    required
}

pub(crate) fn general_requirements(
    facts: &GeneralFacts<'_>,
    table: &[GeneralRequirement],
) -> Vec<DocumentTypeId> {
    let mut documents = Vec::new();
    for requirement in table {
        if (requirement.applies)(facts) && !documents.contains(&requirement.document) {
            documents.push(requirement.document);
        }
    }
    documents
}

pub(crate) fn applicant_requirements(
    facts: &ApplicantFacts<'_>,
    table: &[ApplicantRequirement],
) -> Vec<DocumentTypeId> {
    let mut documents = Vec::new();
    for requirement in table {
        if requirement.gate.skips(facts.person) {
            continue;
        }
        if (requirement.applies)(facts) && !documents.contains(&requirement.document) {
            documents.push(requirement.document);
        }
    }
    documents
}
