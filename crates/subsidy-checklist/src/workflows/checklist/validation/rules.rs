use super::super::documents::DocumentTypeId;
use super::super::domain::{ApplicantRole, FormSection, OtherIncomeEntry};
use super::super::facts::{self, ApplicantFacts, GeneralFacts, IncomeGate};
use super::narrative::{self, Narrative, NOT_PROVIDED};

/// Forms a reviewer should cross-check for an applicant item.
#[derive(Clone, Copy)]
pub(crate) enum ApplicantForms {
    Static(&'static [FormSection]),
    Computed(fn(&ApplicantFacts<'_>) -> Vec<FormSection>),
}

impl ApplicantForms {
    pub fn resolve(self, facts: &ApplicantFacts<'_>) -> Vec<FormSection> {
        match self {
            Self::Static(forms) => forms.to_vec(),
            Self::Computed(compute) => compute(facts),
        }
    }
}

/// Display rule evaluated once per enumerated applicant.
pub(crate) struct ApplicantRule {
    pub document: DocumentTypeId,
    pub title: &'static str,
    pub gate: IncomeGate,
    pub applies: fn(&ApplicantFacts<'_>) -> bool,
    pub narrative: fn(&ApplicantFacts<'_>) -> Narrative,
    pub forms: ApplicantForms,
    /// Document types checked together; empty means just `document`.
    pub bundle: &'static [DocumentTypeId],
}

impl ApplicantRule {
    pub fn documents(&self) -> &[DocumentTypeId] {
        if self.bundle.is_empty() {
            std::slice::from_ref(&self.document)
        } else {
            self.bundle
        }
    }
}

/// Display rule for property or loan scoped documents.
pub(crate) struct GeneralRule {
    pub document: DocumentTypeId,
    pub title: &'static str,
    pub applies: fn(&GeneralFacts<'_>) -> bool,
    pub narrative: fn(&GeneralFacts<'_>) -> Narrative,
    pub forms: &'static [FormSection],
}

/// Document whose necessity cannot be derived from form data; reported once uploaded.
pub(crate) struct UploadRule {
    pub document: DocumentTypeId,
    pub title: &'static str,
    pub intro: &'static str,
    pub forms: &'static [FormSection],
}

const INCOME_FORMS: &[FormSection] = &[FormSection::Einkommenserklaerung, FormSection::Selbstauskunft];

pub(crate) static APPLICANT_RULES: &[ApplicantRule] = &[
    ApplicantRule {
        document: DocumentTypeId::LohnGehaltsbescheinigungen,
        title: "Lohn-/Gehaltsbescheinigungen",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_salary,
        narrative: salary_narrative,
        forms: ApplicantForms::Static(INCOME_FORMS),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::Einkommenssteuerbescheid,
        title: "Einkommenssteuerbescheid / Einkommenssteuererklärung",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_tax_assessed_income,
        narrative: tax_assessment_narrative,
        forms: ApplicantForms::Computed(tax_assessment_forms),
        bundle: &[
            DocumentTypeId::Einkommenssteuerbescheid,
            DocumentTypeId::Einkommenssteuererklaerung,
        ],
    },
    ApplicantRule {
        document: DocumentTypeId::GewinnVerlustRechnung,
        title: "Gewinn- und Verlustrechnung",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_business_income,
        narrative: business_narrative,
        forms: ApplicantForms::Static(&[FormSection::Einkommenserklaerung]),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::KapitalertraegeNachweis,
        title: "Nachweis Kapitalerträge",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_capital_income,
        narrative: capital_narrative,
        forms: ApplicantForms::Static(INCOME_FORMS),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::Rentenbescheid,
        title: "Rentenbescheid",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_pension,
        narrative: pension_narrative,
        forms: ApplicantForms::Static(INCOME_FORMS),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::Arbeitslosengeldbescheid,
        title: "Arbeitslosengeldbescheid",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_unemployment_benefits,
        narrative: unemployment_narrative,
        forms: ApplicantForms::Static(INCOME_FORMS),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::Krankengeldnachweis,
        title: "Krankengeldnachweis",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_sick_pay,
        narrative: sick_pay_narrative,
        forms: ApplicantForms::Static(&[FormSection::Einkommenserklaerung]),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::SonstigeEinkommensnachweise,
        title: "Sonstige Einkommensnachweise",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_other_income,
        narrative: other_income_narrative,
        forms: ApplicantForms::Static(&[FormSection::Einkommenserklaerung]),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::Unterhaltsnachweis,
        title: "Nachweis erhaltener Unterhalt",
        gate: IncomeGate::IncomeContingent,
        applies: facts::receives_alimony,
        narrative: alimony_narrative,
        forms: ApplicantForms::Static(INCOME_FORMS),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::Unterhaltsverpflichtung,
        title: "Nachweis Unterhaltsverpflichtung",
        gate: IncomeGate::IncomeContingent,
        applies: facts::pays_maintenance,
        narrative: maintenance_narrative,
        forms: ApplicantForms::Static(&[
            FormSection::Einkommenserklaerung,
            FormSection::Haushaltsauskunft,
        ]),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::Elterngeldbescheid,
        title: "Elterngeldbescheid",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_elterngeld,
        narrative: elterngeld_narrative,
        forms: ApplicantForms::Static(&[FormSection::Einkommenserklaerung]),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::AuslaendischeEinkuenfte,
        title: "Nachweis ausländische Einkünfte",
        gate: IncomeGate::IncomeContingent,
        applies: facts::has_foreign_income,
        narrative: foreign_income_narrative,
        forms: ApplicantForms::Static(&[FormSection::Einkommenserklaerung]),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::WerbungskostenNachweis,
        title: "Nachweis Werbungskosten",
        gate: IncomeGate::IncomeContingent,
        applies: facts::claims_work_expenses,
        narrative: work_expenses_narrative,
        forms: ApplicantForms::Static(&[FormSection::Einkommenserklaerung]),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::KinderbetreuungskostenNachweis,
        title: "Nachweis Kinderbetreuungskosten",
        gate: IncomeGate::IncomeContingent,
        applies: facts::claims_childcare_costs,
        narrative: childcare_narrative,
        forms: ApplicantForms::Static(&[
            FormSection::Einkommenserklaerung,
            FormSection::Haushaltsauskunft,
        ]),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::Schwerbehindertenausweis,
        title: "Schwerbehindertenausweis",
        gate: IncomeGate::Always,
        applies: facts::has_disability,
        narrative: disability_narrative,
        forms: ApplicantForms::Computed(person_forms),
        bundle: &[],
    },
    ApplicantRule {
        document: DocumentTypeId::Pflegegradnachweis,
        title: "Nachweis Pflegegrad",
        gate: IncomeGate::Always,
        applies: facts::has_care_level,
        narrative: care_level_narrative,
        forms: ApplicantForms::Computed(person_forms),
        bundle: &[],
    },
];

pub(crate) static APPLICANT_UPLOAD_RULES: &[UploadRule] = &[
    UploadRule {
        document: DocumentTypeId::FreiwilligeKrankenversicherung,
        title: "Nachweis freiwillige Krankenversicherung",
        intro: "Es wurde ein Nachweis über eine freiwillige Krankenversicherung hochgeladen. \
                Ob die Beiträge berücksichtigt werden können, ist manuell zu prüfen.",
        forms: &[FormSection::Einkommenserklaerung],
    },
    UploadRule {
        document: DocumentTypeId::FreiwilligeRentenversicherung,
        title: "Nachweis freiwillige Rentenversicherung",
        intro: "Es wurde ein Nachweis über eine freiwillige Rentenversicherung hochgeladen. \
                Ob die Beiträge berücksichtigt werden können, ist manuell zu prüfen.",
        forms: &[FormSection::Einkommenserklaerung],
    },
];

pub(crate) static GENERAL_RULES: &[GeneralRule] = &[
    GeneralRule {
        document: DocumentTypeId::Meldebescheinigung,
        title: "Meldebescheinigung",
        applies: facts::always,
        narrative: residence_narrative,
        forms: &[FormSection::Hauptantrag],
    },
    GeneralRule {
        document: DocumentTypeId::EigenkapitalNachweis,
        title: "Nachweis Eigenkapital",
        applies: facts::always,
        narrative: equity_narrative,
        forms: &[FormSection::Finanzierungsstruktur],
    },
    GeneralRule {
        document: DocumentTypeId::Bauzeichnung,
        title: "Bauzeichnung",
        applies: facts::expects_building_plans,
        narrative: building_plan_narrative,
        forms: &[FormSection::Objektdaten],
    },
    GeneralRule {
        document: DocumentTypeId::BerechnungWohnflaeche,
        title: "Berechnung der Wohn- und Nutzfläche",
        applies: facts::expects_building_plans,
        narrative: living_area_narrative,
        forms: &[FormSection::Objektdaten],
    },
    GeneralRule {
        document: DocumentTypeId::Lageplan,
        title: "Lageplan",
        applies: facts::expects_site_plan,
        narrative: site_plan_narrative,
        forms: &[FormSection::Objektdaten],
    },
    GeneralRule {
        document: DocumentTypeId::Baugenehmigung,
        title: "Baugenehmigung / Bauanzeige",
        applies: facts::expects_building_permit,
        narrative: building_permit_narrative,
        forms: &[FormSection::Objektdaten],
    },
    GeneralRule {
        document: DocumentTypeId::Grundbuchblattkopie,
        title: "Grundbuchblattkopie",
        applies: facts::owns_property,
        narrative: land_register_narrative,
        forms: &[FormSection::Objektdaten],
    },
    GeneralRule {
        document: DocumentTypeId::Kaufvertrag,
        title: "Kaufvertrag",
        applies: facts::is_purchase,
        narrative: purchase_narrative,
        forms: &[FormSection::Objektdaten, FormSection::Kostenstruktur],
    },
    GeneralRule {
        document: DocumentTypeId::Erbbaurechtsvertrag,
        title: "Erbbaurechtsvertrag",
        applies: facts::has_ground_lease,
        narrative: ground_lease_narrative,
        forms: &[FormSection::Objektdaten],
    },
    GeneralRule {
        document: DocumentTypeId::NachweisBarrierefreiheit,
        title: "Nachweis Barrierefreiheit",
        applies: facts::is_barrier_free,
        narrative: barrier_free_narrative,
        forms: &[FormSection::Objektdaten, FormSection::Finanzierungsstruktur],
    },
    GeneralRule {
        document: DocumentTypeId::BergsenkungsgebietErklaerung,
        title: "Erklärung Bergsenkungsgebiet",
        applies: facts::in_mining_subsidence_area,
        narrative: mining_subsidence_narrative,
        forms: &[FormSection::Objektdaten, FormSection::Finanzierungsstruktur],
    },
    GeneralRule {
        document: DocumentTypeId::NachweisStandortbedingteMehrkosten,
        title: "Nachweis standortbedingte Mehrkosten",
        applies: facts::has_location_cost_loan,
        narrative: location_cost_narrative,
        forms: &[FormSection::Finanzierungsstruktur, FormSection::Kostenstruktur],
    },
    GeneralRule {
        document: DocumentTypeId::NachweisHolzbau,
        title: "Nachweis Bauen mit Holz",
        applies: facts::has_timber_construction_loan,
        narrative: timber_narrative,
        forms: &[FormSection::Objektdaten, FormSection::Finanzierungsstruktur],
    },
    GeneralRule {
        document: DocumentTypeId::NachweisEffizienzhaus40,
        title: "Nachweis Effizienzhaus 40",
        applies: facts::has_efficiency_house,
        narrative: efficiency_house_narrative,
        forms: &[FormSection::Objektdaten, FormSection::Finanzierungsstruktur],
    },
    GeneralRule {
        document: DocumentTypeId::Darlehenszusagen,
        title: "Darlehenszusagen",
        applies: facts::has_external_loans,
        narrative: external_loans_narrative,
        forms: &[FormSection::Finanzierungsstruktur],
    },
];

pub(crate) static GENERAL_UPLOAD_RULES: &[UploadRule] = &[UploadRule {
    document: DocumentTypeId::SonstigeDokumente,
    title: "Sonstige Dokumente",
    intro: "Es wurden sonstige Dokumente hochgeladen. Bitte prüfen Sie, ob sie für den Antrag relevant sind.",
    forms: &[FormSection::Dokumente],
}];

// Linked forms.

fn tax_assessment_forms(facts: &ApplicantFacts<'_>) -> Vec<FormSection> {
    let mut forms = vec![FormSection::Einkommenserklaerung];
    if facts.financial.has_rent_income {
        forms.push(FormSection::Selbstauskunft);
    }
    forms
}

fn person_forms(facts: &ApplicantFacts<'_>) -> Vec<FormSection> {
    match facts.identity.role {
        ApplicantRole::Main => vec![FormSection::Hauptantrag],
        ApplicantRole::Additional => vec![FormSection::Haushaltsauskunft],
    }
}

// Applicant narratives.

fn salary_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    let financial = facts.financial;
    Narrative::new("Es wurden Einkünfte aus nichtselbstständiger Arbeit angegeben.")
        .field("Monatliches Bruttogehalt", narrative::amount(financial.income_salary))
        .field("Weihnachtsgeld", narrative::amount(financial.income_christmas_bonus))
        .field("Urlaubsgeld", narrative::amount(financial.income_holiday_bonus))
        .field("Sonstige Sonderzahlungen", narrative::amount(financial.income_other_bonus))
        .field("Zahlt Einkommensteuer", narrative::flag(financial.is_paying_income_tax))
        .field(
            "Zahlt Krankenversicherung",
            narrative::flag(financial.is_paying_health_insurance),
        )
        .field("Zahlt Rentenversicherung", narrative::flag(financial.is_paying_pension))
}

fn tax_assessment_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    let financial = facts.financial;
    Narrative::new(
        "Es wurden Einkünfte angegeben, die über den Einkommensteuerbescheid nachzuweisen sind.",
    )
    .field("Einkünfte aus Vermietung", narrative::flag(financial.has_rent_income))
    .field("Betrag Vermietung", narrative::amount(financial.income_rent))
    .field("Jahr Vermietung", narrative::year(financial.income_rent_year))
    .field("Einkünfte aus Gewerbebetrieb", narrative::flag(financial.has_business_income))
    .field("Betrag Gewerbebetrieb", narrative::amount(financial.income_business))
    .field("Jahr Gewerbebetrieb", narrative::year(financial.income_business_year))
    .field(
        "Einkünfte aus Land- und Forstwirtschaft",
        narrative::flag(financial.has_agriculture_income),
    )
    .field("Betrag Land- und Forstwirtschaft", narrative::amount(financial.income_agriculture))
    .field(
        "Jahr Land- und Forstwirtschaft",
        narrative::year(financial.income_agriculture_year),
    )
}

fn business_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurden Einkünfte aus Gewerbebetrieb oder selbstständiger Arbeit angegeben.")
        .field("Jährlicher Gewinn", narrative::amount(facts.financial.income_business))
        .field("Bezugsjahr", narrative::year(facts.financial.income_business_year))
}

fn capital_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurden Einkünfte aus Kapitalvermögen angegeben.")
        .field("Jährliche Kapitalerträge", narrative::amount(facts.financial.income_capital))
        .field("Bezugsjahr", narrative::year(facts.financial.income_capital_year))
}

fn pension_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurden Renteneinkünfte angegeben.")
        .field("Monatliche Rente", narrative::amount(facts.financial.income_pension))
}

fn unemployment_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurde der Bezug von Arbeitslosengeld angegeben.")
        .field("Monatlicher Betrag", narrative::amount(facts.financial.income_unemployment))
}

fn income_entries<'a>(
    intro: Narrative,
    entries: impl Iterator<Item = &'a OtherIncomeEntry>,
) -> Narrative {
    entries.fold(intro, |text, entry| {
        text.field(entry.income_type.trim(), narrative::amount(entry.amount))
    })
}

fn sick_pay_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    income_entries(
        Narrative::new("Unter den sonstigen monatlichen Nettoeinkünften wurde Krankengeld angegeben."),
        facts.financial.sick_pay_entries(),
    )
}

fn other_income_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    income_entries(
        Narrative::new("Es wurden sonstige monatliche Nettoeinkünfte angegeben."),
        facts.financial.other_income_entries(),
    )
}

fn alimony_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurde der Erhalt von Unterhaltszahlungen angegeben.")
        .field("Monatlicher Unterhalt", narrative::amount(facts.financial.income_alimony))
}

fn maintenance_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurde angegeben, dass Unterhalt gezahlt wird.")
        .field("Monatlicher Betrag", narrative::amount(facts.financial.unterhalt_amount))
        .field(
            "Anzahl Unterhaltsempfänger",
            narrative::count(facts.financial.unterhalt_recipients),
        )
}

fn elterngeld_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurde der Bezug von Elterngeld angegeben.")
        .field("Monatlicher Betrag", narrative::amount(facts.financial.income_elterngeld))
        .field("Bezugsdauer in Monaten", narrative::count(facts.financial.elterngeld_months))
}

fn foreign_income_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    let financial = facts.financial;
    Narrative::new("Es wurden Einkünfte aus dem Ausland angegeben.")
        .field("Betrag", narrative::amount(financial.income_foreign))
        .field("Bezugsjahr", narrative::year(financial.income_foreign_year))
        .field(
            "Währung",
            narrative::text(financial.income_foreign_currency.as_deref()),
        )
}

fn work_expenses_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurden Werbungskosten geltend gemacht, die über der Pauschale liegen.")
        .field("Jährliche Werbungskosten", narrative::amount(facts.financial.werbungskosten))
}

fn childcare_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurden Kinderbetreuungskosten geltend gemacht.").field(
        "Jährliche Kinderbetreuungskosten",
        narrative::amount(facts.financial.kinderbetreuungskosten),
    )
}

fn disability_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new(format!(
        "Es wurde ein Grad der Behinderung von mindestens {} angegeben.",
        facts.config.disability_grade_threshold
    ))
    .field("Grad der Behinderung", narrative::count(facts.person.disability_grade))
}

fn care_level_narrative(facts: &ApplicantFacts<'_>) -> Narrative {
    Narrative::new("Es wurde ein Pflegegrad angegeben.")
        .field("Pflegegrad", narrative::count(facts.person.care_level))
}

// General narratives.

fn variant_label(facts: &GeneralFacts<'_>) -> String {
    facts
        .object
        .foerder_variante
        .map(|variant| variant.label().to_string())
        .unwrap_or_else(|| NOT_PROVIDED.to_string())
}

fn residence_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Die Meldebescheinigung ist für alle Anträge erforderlich.").field(
        "Anschrift Hauptantragsteller/in",
        narrative::address(facts.main_applicant.address.as_ref()),
    )
}

fn equity_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Der Nachweis des Eigenkapitals ist für alle Anträge erforderlich.")
        .field("Eigenkapital", narrative::amount(facts.finance.eigenkapital))
        .field("Eigenleistung", narrative::amount(facts.finance.eigenleistung))
}

fn building_plan_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Für die gewählte Fördervariante sind Bauzeichnungen erforderlich.")
        .field("Fördervariante", variant_label(facts))
        .field("Wohnfläche (m²)", narrative::count(facts.object.wohnflaeche))
}

fn living_area_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Die angegebene Wohnfläche ist durch eine Flächenberechnung nachzuweisen.")
        .field("Fördervariante", variant_label(facts))
        .field("Wohnfläche (m²)", narrative::count(facts.object.wohnflaeche))
}

fn site_plan_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Für die gewählte Fördervariante ist ein Lageplan erforderlich.")
        .field("Fördervariante", variant_label(facts))
        .field("Objektanschrift", narrative::address(facts.object.address.as_ref()))
}

fn building_permit_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Für die gewählte Fördervariante ist eine Baugenehmigung oder Bauanzeige erforderlich.")
        .field("Fördervariante", variant_label(facts))
        .field("Baujahr", narrative::year(facts.object.baujahr))
}

fn land_register_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Es wurde angegeben, dass sich das Grundstück bereits im Eigentum befindet.")
        .field("Grundbuchblatt", narrative::text(facts.object.grundbuch_blatt.as_deref()))
        .field("Objektanschrift", narrative::address(facts.object.address.as_ref()))
}

fn purchase_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Für einen Erwerb ist der notarielle Kaufvertrag erforderlich.")
        .field("Fördervariante", variant_label(facts))
        .field("Kaufpreis", narrative::amount(facts.cost.kaufpreis))
        .field("Grundstückskosten", narrative::amount(facts.cost.grundstueckskosten))
}

fn ground_lease_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Es wurde ein Erbbaurecht angegeben.").field(
        "Restlaufzeit in Jahren",
        narrative::count(facts.object.erbbaurecht_restlaufzeit),
    )
}

fn barrier_free_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Es wurde barrierefreies Bauen oder ein Zusatzdarlehen für Barrierefreiheit angegeben.")
        .field("Barrierefrei", narrative::flag(facts.object.barrierefrei))
        .field(
            "Zusatzdarlehen Barrierefreiheit",
            narrative::amount(facts.finance.zusatzdarlehen.barrierefreiheit),
        )
}

fn mining_subsidence_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Das Objekt liegt nach den Angaben in einem Bergsenkungsgebiet.")
        .field("Bergsenkungsgebiet", narrative::flag(facts.object.bergsenkungsgebiet))
        .field(
            "Zusatzdarlehen Bergsenkung",
            narrative::amount(facts.finance.zusatzdarlehen.bergsenkung),
        )
}

fn location_cost_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Es wurde ein Zusatzdarlehen für standortbedingte Mehrkosten beantragt.")
        .field(
            "Zusatzdarlehen",
            narrative::amount(facts.finance.zusatzdarlehen.standortbedingte_mehrkosten),
        )
        .field(
            "Standortbedingte Mehrkosten",
            narrative::amount(facts.cost.standortbedingte_mehrkosten),
        )
}

fn timber_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Es wurde ein Zusatzdarlehen für Bauen mit Holz beantragt.")
        .field("Holzbauweise", narrative::flag(facts.object.holzbau))
        .field(
            "Zusatzdarlehen",
            narrative::amount(facts.finance.zusatzdarlehen.bauen_mit_holz),
        )
}

fn efficiency_house_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    Narrative::new("Es wurde der Effizienzhaus-40-Standard angegeben.")
        .field("Effizienzhaus 40", narrative::flag(facts.object.effizienzhaus40))
        .field(
            "Zusatzdarlehen",
            narrative::amount(facts.finance.zusatzdarlehen.effizienzhaus40),
        )
}

fn external_loans_narrative(facts: &GeneralFacts<'_>) -> Narrative {
    let intro = Narrative::new("Es wurden Fremddarlehen in der Finanzierung angegeben.");
    facts
        .finance
        .fremddarlehen
        .iter()
        .filter(|loan| loan.is_declared())
        .enumerate()
        .fold(intro, |text, (position, loan)| {
            text.field(
                &format!("Darlehen {}", position + 1),
                format!(
                    "{}, {}, Zinssatz {}",
                    narrative::text(loan.lender.as_deref()),
                    narrative::amount(loan.principal),
                    loan.interest_rate
                        .value()
                        .map(|rate| format!("{rate:.2} %"))
                        .unwrap_or_else(|| NOT_PROVIDED.to_string())
                ),
            )
        })
}
