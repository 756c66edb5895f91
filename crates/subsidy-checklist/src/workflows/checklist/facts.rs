//! Read-only views handed to the rule tables, plus the predicates both rule
//! tables share so requirement and display logic cannot drift apart.

use super::config::ChecklistConfig;
use super::domain::{
    ApplicantIdentity, CostStructureRecord, FinanceStructureRecord, FinancialRecord, FoerderVariante,
    ObjectRecord, PersonRecord,
};
use super::normalizer::NormalizedHousehold;

/// Data a per-applicant rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct ApplicantFacts<'a> {
    pub identity: &'a ApplicantIdentity,
    pub person: &'a PersonRecord,
    pub financial: &'a FinancialRecord,
    pub config: &'a ChecklistConfig,
}

impl<'a> ApplicantFacts<'a> {
    /// Looks up the person and financial record behind an enumerated applicant.
    pub fn resolve(
        household: &'a NormalizedHousehold,
        identity: &'a ApplicantIdentity,
        config: &'a ChecklistConfig,
    ) -> Option<Self> {
        Some(Self {
            identity,
            person: household.person(identity)?,
            financial: household.financial(identity)?,
            config,
        })
    }
}

/// Data a general (property or loan scoped) rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct GeneralFacts<'a> {
    pub main_applicant: &'a PersonRecord,
    pub object: &'a ObjectRecord,
    pub finance: &'a FinanceStructureRecord,
    pub cost: &'a CostStructureRecord,
}

/// Whether a per-applicant rule is skipped for applicants declaring no income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeGate {
    IncomeContingent,
    Always,
}

impl IncomeGate {
    pub fn skips(self, person: &PersonRecord) -> bool {
        self == Self::IncomeContingent && person.has_no_income
    }
}

// Applicant predicates.

pub(crate) fn has_salary(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_salary_income
}

pub(crate) fn has_tax_assessed_income(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_tax_assessed_income()
}

pub(crate) fn has_business_income(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_business_income
}

pub(crate) fn has_capital_income(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_capital_income
}

pub(crate) fn has_pension(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_pension_income
}

pub(crate) fn has_unemployment_benefits(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_unemployment_benefits
}

pub(crate) fn has_sick_pay(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_sick_pay()
}

pub(crate) fn has_other_income(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_other_income()
}

pub(crate) fn receives_alimony(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_alimony_income
}

pub(crate) fn pays_maintenance(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.is_paying_unterhalt
}

pub(crate) fn has_elterngeld(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_elterngeld
}

pub(crate) fn has_foreign_income(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.has_foreign_income
}

pub(crate) fn claims_work_expenses(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.werbungskosten.is_positive()
}

pub(crate) fn claims_childcare_costs(facts: &ApplicantFacts<'_>) -> bool {
    facts.financial.kinderbetreuungskosten.is_positive()
}

pub(crate) fn has_disability(facts: &ApplicantFacts<'_>) -> bool {
    facts
        .person
        .has_disability_grade_at_least(facts.config.disability_grade_threshold)
}

pub(crate) fn has_care_level(facts: &ApplicantFacts<'_>) -> bool {
    facts.person.has_care_level()
}

// General predicates.

fn variant_matches(facts: &GeneralFacts<'_>, predicate: fn(FoerderVariante) -> bool) -> bool {
    facts.object.foerder_variante.map(predicate).unwrap_or(false)
}

pub(crate) fn always(_: &GeneralFacts<'_>) -> bool {
    true
}

pub(crate) fn expects_building_plans(facts: &GeneralFacts<'_>) -> bool {
    variant_matches(facts, |variant| {
        variant.is_neubau() || variant.is_ersterwerb() || variant.is_nutzungsaenderung()
    })
}

pub(crate) fn expects_site_plan(facts: &GeneralFacts<'_>) -> bool {
    variant_matches(facts, |variant| variant.is_neubau() || variant.is_ersterwerb())
}

pub(crate) fn expects_building_permit(facts: &GeneralFacts<'_>) -> bool {
    variant_matches(facts, |variant| {
        variant.is_neubau() || variant.is_nutzungsaenderung()
    })
}

pub(crate) fn owns_property(facts: &GeneralFacts<'_>) -> bool {
    facts.object.eigentumsverhaeltnis
}

pub(crate) fn is_purchase(facts: &GeneralFacts<'_>) -> bool {
    variant_matches(facts, FoerderVariante::is_erwerb)
}

pub(crate) fn has_ground_lease(facts: &GeneralFacts<'_>) -> bool {
    facts.object.erbbaurecht
}

pub(crate) fn is_barrier_free(facts: &GeneralFacts<'_>) -> bool {
    facts.object.barrierefrei || facts.finance.zusatzdarlehen.barrierefreiheit.is_positive()
}

pub(crate) fn in_mining_subsidence_area(facts: &GeneralFacts<'_>) -> bool {
    facts.object.bergsenkungsgebiet || facts.finance.zusatzdarlehen.bergsenkung.is_positive()
}

pub(crate) fn has_location_cost_loan(facts: &GeneralFacts<'_>) -> bool {
    facts
        .finance
        .zusatzdarlehen
        .standortbedingte_mehrkosten
        .is_positive()
}

pub(crate) fn has_timber_construction_loan(facts: &GeneralFacts<'_>) -> bool {
    facts.finance.zusatzdarlehen.bauen_mit_holz.is_positive()
}

pub(crate) fn has_efficiency_house(facts: &GeneralFacts<'_>) -> bool {
    facts.object.effizienzhaus40 || facts.finance.zusatzdarlehen.effizienzhaus40.is_positive()
}

pub(crate) fn has_external_loans(facts: &GeneralFacts<'_>) -> bool {
    facts.finance.has_external_loans()
}
