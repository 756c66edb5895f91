use super::super::documents::DocumentTypeId;
use super::super::facts::{self, ApplicantFacts, GeneralFacts, IncomeGate};

/// Document mandated by property or loan data.
pub(crate) struct GeneralRequirement {
    pub document: DocumentTypeId,
    pub applies: fn(&GeneralFacts<'_>) -> bool,
}

/// Document mandated by one applicant's declarations.
pub(crate) struct ApplicantRequirement {
    pub document: DocumentTypeId,
    pub gate: IncomeGate,
    pub applies: fn(&ApplicantFacts<'_>) -> bool,
}

pub(crate) static GENERAL_REQUIREMENTS: &[GeneralRequirement] = &[
    GeneralRequirement {
        document: DocumentTypeId::Meldebescheinigung,
        applies: facts::always,
    },
    GeneralRequirement {
        document: DocumentTypeId::EigenkapitalNachweis,
        applies: facts::always,
    },
    GeneralRequirement {
        document: DocumentTypeId::Bauzeichnung,
        applies: facts::expects_building_plans,
    },
    GeneralRequirement {
        document: DocumentTypeId::BerechnungWohnflaeche,
        applies: facts::expects_building_plans,
    },
    GeneralRequirement {
        document: DocumentTypeId::Lageplan,
        applies: facts::expects_site_plan,
    },
    GeneralRequirement {
        document: DocumentTypeId::Baugenehmigung,
        applies: facts::expects_building_permit,
    },
    GeneralRequirement {
        document: DocumentTypeId::Grundbuchblattkopie,
        applies: facts::owns_property,
    },
    GeneralRequirement {
        document: DocumentTypeId::Kaufvertrag,
        applies: facts::is_purchase,
    },
    GeneralRequirement {
        document: DocumentTypeId::Erbbaurechtsvertrag,
        applies: facts::has_ground_lease,
    },
    GeneralRequirement {
        document: DocumentTypeId::NachweisBarrierefreiheit,
        applies: facts::is_barrier_free,
    },
    GeneralRequirement {
        document: DocumentTypeId::BergsenkungsgebietErklaerung,
        applies: facts::in_mining_subsidence_area,
    },
    GeneralRequirement {
        document: DocumentTypeId::NachweisStandortbedingteMehrkosten,
        applies: facts::has_location_cost_loan,
    },
    GeneralRequirement {
        document: DocumentTypeId::NachweisHolzbau,
        applies: facts::has_timber_construction_loan,
    },
    GeneralRequirement {
        document: DocumentTypeId::NachweisEffizienzhaus40,
        applies: facts::has_efficiency_house,
    },
    GeneralRequirement {
        document: DocumentTypeId::Darlehenszusagen,
        applies: facts::has_external_loans,
    },
];

pub(crate) static APPLICANT_REQUIREMENTS: &[ApplicantRequirement] = &[
    ApplicantRequirement {
        document: DocumentTypeId::LohnGehaltsbescheinigungen,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_salary,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Einkommenssteuerbescheid,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_tax_assessed_income,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Einkommenssteuererklaerung,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_tax_assessed_income,
    },
    ApplicantRequirement {
        document: DocumentTypeId::GewinnVerlustRechnung,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_business_income,
    },
    ApplicantRequirement {
        document: DocumentTypeId::KapitalertraegeNachweis,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_capital_income,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Rentenbescheid,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_pension,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Arbeitslosengeldbescheid,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_unemployment_benefits,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Krankengeldnachweis,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_sick_pay,
    },
    ApplicantRequirement {
        document: DocumentTypeId::SonstigeEinkommensnachweise,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_other_income,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Unterhaltsnachweis,
        gate: IncomeGate::IncomeContingent,
        applies: facts::receives_alimony,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Unterhaltsverpflichtung,
        gate: IncomeGate::IncomeContingent,
        applies: facts::pays_maintenance,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Elterngeldbescheid,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_elterngeld,
    },
    ApplicantRequirement {
        document: DocumentTypeId::AuslaendischeEinkuenfte,
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_foreign_income,
    },
    ApplicantRequirement {
        document: DocumentTypeId::WerbungskostenNachweis,
        gate: IncomeGate::IncomeContingent,
        applies: facts::claims_work_expenses,
    },
    ApplicantRequirement {
        document: DocumentTypeId::KinderbetreuungskostenNachweis,
        gate: IncomeGate::IncomeContingent,
        applies: facts::claims_childcare_costs,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Schwerbehindertenausweis,
        gate: IncomeGate::Always,
        applies: facts::has_disability,
    },
    ApplicantRequirement {
        document: DocumentTypeId::Pflegegradnachweis,
        gate: IncomeGate::Always,
        applies: facts::has_care_level,
    },
];
