use serde::{Deserialize, Serialize};

/// Policy dials for requirement determination and the loan-cap checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistConfig {
    /// Minimum Grad der Behinderung that requires a disability card.
    pub disability_grade_threshold: u8,
    pub family_bonus_per_person: u32,
    pub barrier_free_loan_cap: u32,
    pub mining_subsidence_loan_cap: u32,
    pub location_cost_loan_cap: u32,
    /// Share of the declared location-related costs the loan may cover.
    pub location_cost_loan_share: f32,
    pub timber_construction_loan_cap: u32,
    pub efficiency_house_loan_cap: u32,
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            disability_grade_threshold: 50,
            family_bonus_per_person: 24_000,
            barrier_free_loan_cap: 11_700,
            mining_subsidence_loan_cap: 11_700,
            location_cost_loan_cap: 25_000,
            location_cost_loan_share: 0.75,
            timber_construction_loan_cap: 17_000,
            efficiency_house_loan_cap: 30_000,
        }
    }
}
