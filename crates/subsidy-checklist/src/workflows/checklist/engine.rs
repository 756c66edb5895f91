use super::applicants;
use super::config::ChecklistConfig;
use super::documents::EvidenceIndex;
use super::domain::{ApplicantIdentity, ChecklistItem, ChecklistSnapshot};
use super::facts::{ApplicantFacts, GeneralFacts};
use super::findings::{self, EligibilityResults, LoanCapContext};
use super::normalizer::{self, NormalizedHousehold};
use super::requirements::{self, RequiredDocuments, RequirementContext};
use super::synthesis::{self, ChecklistSections, FetchDegradation};
use super::validation;

/// Everything one generation run consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChecklistInput {
    pub snapshot: ChecklistSnapshot,
    pub eligibility: EligibilityResults,
    pub degradations: Vec<FetchDegradation>,
}

/// Pure checklist generation over a fetched snapshot.
#[derive(Debug, Clone, Default)]
pub struct ChecklistGenerator {
    config: ChecklistConfig,
}

impl ChecklistGenerator {
    pub fn new(config: ChecklistConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChecklistConfig {
        &self.config
    }

    pub fn required_documents(&self, snapshot: &ChecklistSnapshot) -> RequiredDocuments {
        let household = Self::household(snapshot);
        let applicants = applicants::enumerate(&household);
        self.determine(snapshot, &household, &applicants)
    }

    pub fn generate(&self, input: &ChecklistInput) -> Vec<ChecklistItem> {
        let snapshot = &input.snapshot;
        let household = Self::household(snapshot);
        let applicants = applicants::enumerate(&household);
        let evidence = EvidenceIndex::new(&snapshot.application.documents);
        let required = self.determine(snapshot, &household, &applicants);

        let mut applicant_items = Vec::new();
        // Person records carry no age, so every enumerated member at or above the threshold
        // counts here; children are only ever counted through `child_count`.
        let mut disabled_adults = 0;
        for identity in &applicants {
            let Some(facts) = ApplicantFacts::resolve(&household, identity, &self.config) else {
                continue;
            };
            if facts
                .person
                .has_disability_grade_at_least(self.config.disability_grade_threshold)
            {
                disabled_adults += 1;
            }
            applicant_items.extend(validation::generate_applicant_items(&facts, &evidence));
        }

        let sections = ChecklistSections {
            applicant_items,
            general_items: validation::generate_general_items(
                &Self::general_facts(snapshot, &household),
                &evidence,
            ),
            completeness: findings::completeness_items(&snapshot.form_progress),
            document_completeness: Some(synthesis::document_completeness_item(
                &required,
                &applicants,
                &evidence,
            )),
            informational: synthesis::informational_items(&required, &applicants, &evidence),
            findings: findings::eligibility_items(&input.eligibility),
            loan_caps: findings::loan_cap_items(&LoanCapContext {
                finance: &snapshot.finance_structure,
                cost: &snapshot.cost_structure,
                child_count: snapshot.application.child_count,
                disabled_adults,
                config: &self.config,
            }),
            degradations: synthesis::degradation_items(&input.degradations),
        };

        let items = synthesis::synthesize(sections);
        tracing::debug!(
            applicants = applicants.len(),
            items = items.len(),
            "generated checklist items"
        );
        items
    }

    fn household(snapshot: &ChecklistSnapshot) -> NormalizedHousehold {
        normalizer::normalize(&snapshot.application, &snapshot.financials)
    }

    fn general_facts<'a>(
        snapshot: &'a ChecklistSnapshot,
        household: &'a NormalizedHousehold,
    ) -> GeneralFacts<'a> {
        GeneralFacts {
            main_applicant: &household.main,
            object: &snapshot.object,
            finance: &snapshot.finance_structure,
            cost: &snapshot.cost_structure,
        }
    }

    fn determine(
        &self,
        snapshot: &ChecklistSnapshot,
        household: &NormalizedHousehold,
        applicants: &[ApplicantIdentity],
    ) -> RequiredDocuments {
        requirements::determine_required(&RequirementContext {
            household,
            applicants,
            general: Self::general_facts(snapshot, household),
            config: &self.config,
        })
    }
}
