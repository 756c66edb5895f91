use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::super::domain::{ChecklistItem, FormSection, SystemStatus};

const NARRATIVE_PREFIX: &str = "Ergebnis der automatischen Berechnung:";
const SUCCESS_SENTENCE: &str = "Die Berechnung ist ohne Auffälligkeiten abgeschlossen.";

/// Named computation of the external eligibility calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EligibilityCheck {
    #[serde(rename = "haushaltseinkommen")]
    HouseholdIncome,
    #[serde(rename = "einkommensgruppe")]
    IncomeGroup,
    #[serde(rename = "verfuegbares_monatseinkommen")]
    AvailableMonthlyIncome,
    #[serde(rename = "zusatzkriterien_finanzierung")]
    AdditionalFinancialCriteria,
    #[serde(rename = "formularuebergreifende_pruefung")]
    CrossFormConsistency,
}

impl EligibilityCheck {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::HouseholdIncome,
            Self::IncomeGroup,
            Self::AvailableMonthlyIncome,
            Self::AdditionalFinancialCriteria,
            Self::CrossFormConsistency,
        ]
    }

    pub const fn item_id(self) -> &'static str {
        match self {
            Self::HouseholdIncome => "haushaltseinkommen",
            Self::IncomeGroup => "einkommensgruppe",
            Self::AvailableMonthlyIncome => "verfuegbares_monatseinkommen",
            Self::AdditionalFinancialCriteria => "zusatzkriterien_finanzierung",
            Self::CrossFormConsistency => "formularuebergreifende_pruefung",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::HouseholdIncome => "Berechnung Haushaltseinkommen",
            Self::IncomeGroup => "Einkommensgruppe",
            Self::AvailableMonthlyIncome => "Verfügbares Monatseinkommen",
            Self::AdditionalFinancialCriteria => "Zusätzliche Finanzierungskriterien",
            Self::CrossFormConsistency => "Formularübergreifende Prüfung",
        }
    }

    pub const fn forms(self) -> &'static [FormSection] {
        match self {
            Self::HouseholdIncome | Self::IncomeGroup => &[
                FormSection::Einkommenserklaerung,
                FormSection::Haushaltsauskunft,
            ],
            Self::AvailableMonthlyIncome => &[FormSection::Selbstauskunft],
            Self::AdditionalFinancialCriteria => &[
                FormSection::Finanzierungsstruktur,
                FormSection::Kostenstruktur,
            ],
            Self::CrossFormConsistency => &[
                FormSection::Hauptantrag,
                FormSection::Einkommenserklaerung,
                FormSection::Objektdaten,
                FormSection::Finanzierungsstruktur,
            ],
        }
    }
}

impl fmt::Display for EligibilityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.item_id())
    }
}

/// Pre-computed lines returned by the calculator for one check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationReport {
    pub calculations: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculatorError {
    #[error("calculation failed: {0}")]
    Failed(String),
    #[error("skipped because {dependency} failed")]
    DependencyFailed { dependency: EligibilityCheck },
}

pub type EligibilityResults = BTreeMap<EligibilityCheck, Result<CalculationReport, CalculatorError>>;

pub fn status_for(report: &CalculationReport) -> SystemStatus {
    if !report.errors.is_empty() {
        SystemStatus::Wrong
    } else if report.warnings.is_empty() && !report.calculations.is_empty() {
        SystemStatus::Correct
    } else {
        SystemStatus::Undefined
    }
}

/// One item per check; a check absent from `results` counts as an empty report.
pub fn eligibility_items(results: &EligibilityResults) -> Vec<ChecklistItem> {
    EligibilityCheck::ordered()
        .into_iter()
        .map(|check| match results.get(&check) {
            Some(Ok(report)) => report_item(check, report),
            Some(Err(err)) => failed_item(check, err),
            None => report_item(check, &CalculationReport::default()),
        })
        .collect()
}

fn report_item(check: EligibilityCheck, report: &CalculationReport) -> ChecklistItem {
    let status = status_for(report);

    let mut lines = vec![NARRATIVE_PREFIX.to_string()];
    lines.extend(report.calculations.iter().cloned());
    if status == SystemStatus::Correct {
        lines.push(SUCCESS_SENTENCE.to_string());
    }

    ChecklistItem::new(check.item_id(), check.title(), status)
        .with_comment(lines.join("\n"))
        .with_errors(report.errors.clone())
        .with_warnings(report.warnings.clone())
        .with_forms(check.forms())
}

fn failed_item(check: EligibilityCheck, err: &CalculatorError) -> ChecklistItem {
    ChecklistItem::new(check.item_id(), check.title(), SystemStatus::Wrong)
        .with_comment(NARRATIVE_PREFIX)
        .with_errors(vec![err.to_string()])
        .with_forms(check.forms())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(calculations: &[&str], errors: &[&str], warnings: &[&str]) -> CalculationReport {
        let owned = |lines: &[&str]| lines.iter().map(|line| line.to_string()).collect();
        CalculationReport {
            calculations: owned(calculations),
            errors: owned(errors),
            warnings: owned(warnings),
        }
    }

    #[test]
    fn status_follows_errors_then_warnings_then_calculations() {
        assert_eq!(status_for(&report(&["a"], &["x"], &[])), SystemStatus::Wrong);
        assert_eq!(status_for(&report(&["a"], &[], &[])), SystemStatus::Correct);
        assert_eq!(status_for(&report(&["a"], &[], &["w"])), SystemStatus::Undefined);
        assert_eq!(status_for(&report(&[], &[], &[])), SystemStatus::Undefined);
    }

    #[test]
    fn success_sentence_only_for_correct_items() {
        let mut results = EligibilityResults::new();
        results.insert(
            EligibilityCheck::HouseholdIncome,
            Ok(report(&["Summe: 42.000 €"], &[], &[])),
        );
        results.insert(
            EligibilityCheck::IncomeGroup,
            Ok(report(&["Gruppe A"], &[], &["Grenzwert knapp"])),
        );

        let items = eligibility_items(&results);

        assert_eq!(items.len(), 5);
        assert!(items[0].system_comment.ends_with(SUCCESS_SENTENCE));
        assert!(items[0].system_comment.contains("Summe: 42.000 €"));
        assert!(!items[1].system_comment.contains(SUCCESS_SENTENCE));
        assert_eq!(items[1].system_warnings.as_deref(), Some(&["Grenzwert knapp".to_string()][..]));
    }

    #[test]
    fn calculator_failure_becomes_wrong_item_with_single_error() {
        let mut results = EligibilityResults::new();
        results.insert(
            EligibilityCheck::CrossFormConsistency,
            Err(CalculatorError::Failed("timeout".into())),
        );

        let items = eligibility_items(&results);
        let failed = items
            .iter()
            .find(|item| item.id == "formularuebergreifende_pruefung")
            .expect("cross-form item");

        assert_eq!(failed.system_status, SystemStatus::Wrong);
        assert_eq!(failed.system_errors, vec!["calculation failed: timeout".to_string()]);
    }
}
