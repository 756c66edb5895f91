//! Items derived from calculations rather than from document presence.

pub mod completeness;
pub mod eligibility;
pub mod loan_caps;

pub use completeness::{completeness_item_id, completeness_items};
pub use eligibility::{
    eligibility_items, CalculationReport, CalculatorError, EligibilityCheck, EligibilityResults,
};
pub use loan_caps::{loan_cap_item_id, loan_cap_items, LoanCapContext};
