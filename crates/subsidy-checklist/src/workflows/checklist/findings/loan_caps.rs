//! Self-contained ceilings for supplementary loans.
//!
//! A loan within its ceilings stays `undefined`; only an exceeded bound is flagged.

use super::super::config::ChecklistConfig;
use super::super::domain::{
    ChecklistItem, CostStructureRecord, FinanceStructureRecord, FormNumber, FormSection,
    SupplementaryLoans, SystemStatus,
};
use super::super::validation::narrative::{self, Narrative};

/// Household figures and records a loan-cap rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct LoanCapContext<'a> {
    pub finance: &'a FinanceStructureRecord,
    pub cost: &'a CostStructureRecord,
    pub child_count: u32,
    /// Enumerated applicants with a disability grade at or above the threshold.
    pub disabled_adults: u32,
    pub config: &'a ChecklistConfig,
}

#[derive(Debug, Clone, PartialEq)]
struct Ceiling {
    label: String,
    limit: f64,
}

struct LoanCapRule {
    loan: &'static str,
    title: &'static str,
    principal: fn(&SupplementaryLoans) -> FormNumber,
    ceilings: fn(&LoanCapContext<'_>) -> Vec<Ceiling>,
    forms: &'static [FormSection],
}

static LOAN_CAP_RULES: &[LoanCapRule] = &[
    LoanCapRule {
        loan: "familienbonus",
        title: "Höchstbetrag Familienbonus",
        principal: |loans| loans.familienbonus,
        ceilings: family_bonus_ceiling,
        forms: &[FormSection::Finanzierungsstruktur, FormSection::Haushaltsauskunft],
    },
    LoanCapRule {
        loan: "barrierefreiheit",
        title: "Höchstbetrag Zusatzdarlehen Barrierefreiheit",
        principal: |loans| loans.barrierefreiheit,
        ceilings: |ctx| fixed("Höchstbetrag", ctx.config.barrier_free_loan_cap),
        forms: &[FormSection::Finanzierungsstruktur],
    },
    LoanCapRule {
        loan: "bergsenkung",
        title: "Höchstbetrag Zusatzdarlehen Bergsenkung",
        principal: |loans| loans.bergsenkung,
        ceilings: |ctx| fixed("Höchstbetrag", ctx.config.mining_subsidence_loan_cap),
        forms: &[FormSection::Finanzierungsstruktur],
    },
    LoanCapRule {
        loan: "standortbedingte_mehrkosten",
        title: "Höchstbetrag Zusatzdarlehen standortbedingte Mehrkosten",
        principal: |loans| loans.standortbedingte_mehrkosten,
        ceilings: location_cost_ceilings,
        forms: &[FormSection::Finanzierungsstruktur, FormSection::Kostenstruktur],
    },
    LoanCapRule {
        loan: "bauen_mit_holz",
        title: "Höchstbetrag Zusatzdarlehen Bauen mit Holz",
        principal: |loans| loans.bauen_mit_holz,
        ceilings: |ctx| fixed("Höchstbetrag", ctx.config.timber_construction_loan_cap),
        forms: &[FormSection::Finanzierungsstruktur],
    },
    LoanCapRule {
        loan: "effizienzhaus40",
        title: "Höchstbetrag Zusatzdarlehen Effizienzhaus 40",
        principal: |loans| loans.effizienzhaus40,
        ceilings: |ctx| fixed("Höchstbetrag", ctx.config.efficiency_house_loan_cap),
        forms: &[FormSection::Finanzierungsstruktur],
    },
];

pub fn loan_cap_item_id(loan: &str) -> String {
    format!("darlehensgrenze_{loan}")
}

/// One item per declared (positive) supplementary loan.
pub fn loan_cap_items(context: &LoanCapContext<'_>) -> Vec<ChecklistItem> {
    LOAN_CAP_RULES
        .iter()
        .filter_map(|rule| evaluate(rule, context))
        .collect()
}

fn evaluate(rule: &LoanCapRule, context: &LoanCapContext<'_>) -> Option<ChecklistItem> {
    let principal = (rule.principal)(&context.finance.zusatzdarlehen);
    let declared = principal.value().filter(|amount| *amount > 0.0)?;
    let ceilings = (rule.ceilings)(context);

    let errors: Vec<String> = ceilings
        .iter()
        .filter(|ceiling| declared > ceiling.limit)
        .map(|ceiling| {
            format!(
                "Beantragter Betrag von {} überschreitet {} von {}",
                narrative::amount(principal),
                ceiling.label,
                narrative::amount(FormNumber::new(ceiling.limit))
            )
        })
        .collect();
    let status = if errors.is_empty() {
        SystemStatus::Undefined
    } else {
        SystemStatus::Wrong
    };

    let comment = ceilings
        .iter()
        .fold(
            Narrative::new("Das beantragte Zusatzdarlehen wurde gegen die zulässigen Grenzen geprüft.")
                .field("Beantragt", narrative::amount(principal)),
            |text, ceiling| {
                text.field(
                    &ceiling.label,
                    narrative::amount(FormNumber::new(ceiling.limit)),
                )
            },
        )
        .cross_check(rule.forms);

    Some(
        ChecklistItem::new(loan_cap_item_id(rule.loan), rule.title, status)
            .with_comment(comment)
            .with_errors(errors)
            .with_forms(rule.forms),
    )
}

fn fixed(label: &str, cap: u32) -> Vec<Ceiling> {
    vec![Ceiling {
        label: label.to_string(),
        limit: f64::from(cap),
    }]
}

fn family_bonus_ceiling(context: &LoanCapContext<'_>) -> Vec<Ceiling> {
    let persons = context.child_count + context.disabled_adults;
    vec![Ceiling {
        label: format!(
            "Höchstbetrag ({} Kinder + {} Erwachsene mit Behinderung)",
            context.child_count, context.disabled_adults
        ),
        limit: f64::from(persons) * f64::from(context.config.family_bonus_per_person),
    }]
}

fn location_cost_ceilings(context: &LoanCapContext<'_>) -> Vec<Ceiling> {
    let share = f64::from(context.config.location_cost_loan_share);
    let mut ceilings = fixed("Höchstbetrag", context.config.location_cost_loan_cap);
    ceilings.push(Ceiling {
        label: format!(
            "Anteilsgrenze ({:.0} % der standortbedingten Mehrkosten)",
            share * 100.0
        ),
        limit: context.cost.standortbedingte_mehrkosten.or_zero() * share,
    });
    ceilings
}
