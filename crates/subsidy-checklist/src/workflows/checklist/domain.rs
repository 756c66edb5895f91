use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Identifier wrapper for subsidy applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric form value tolerant of the shapes legacy form data was stored in.
///
/// Accepts JSON numbers as well as strings such as `"1200"`, `"1.200,50"`, `"1,200.50"` or
/// `"850 €"`. Anything that cannot be coerced unambiguously is treated as "not provided".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormNumber(Option<f64>);

impl FormNumber {
    pub const fn new(value: f64) -> Self {
        Self(Some(value))
    }

    pub const fn empty() -> Self {
        Self(None)
    }

    pub fn value(self) -> Option<f64> {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0.map(|value| value > 0.0).unwrap_or(false)
    }

    pub fn or_zero(self) -> f64 {
        self.0.unwrap_or(0.0)
    }
}

impl From<f64> for FormNumber {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Serialize for FormNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FormNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let parsed = match raw {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => parse_form_number(&text),
            _ => None,
        };
        Ok(Self(parsed.filter(|value| value.is_finite())))
    }
}

pub(crate) fn parse_form_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // "1,200.50": comma grouping with a decimal point.
        (Some(comma), Some(dot)) if comma < dot => {
            if !is_grouped_thousands(&cleaned[..dot], ',') {
                return None;
            }
            cleaned.replace(',', "")
        }
        // "1,200,000": comma grouping without decimals.
        (Some(_), None) if cleaned.matches(',').count() > 1 => {
            if !is_grouped_thousands(&cleaned, ',') {
                return None;
            }
            cleaned.replace(',', "")
        }
        (Some(_), _) => cleaned.replace('.', "").replace(',', "."),
        (None, Some(_)) if is_grouped_thousands(&cleaned, '.') => cleaned.replace('.', ""),
        (None, _) => cleaned,
    };

    normalized.parse::<f64>().ok()
}

// "1.200" or "12.500.000": thousands groups joined by `separator`, no decimals.
fn is_grouped_thousands(value: &str, separator: char) -> bool {
    let mut groups = value.trim_start_matches('-').split(separator);
    let head_ok = groups
        .next()
        .map(|head| !head.is_empty() && head.len() <= 3 && head.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);
    let mut tail_seen = false;
    let tail_ok = groups.all(|group| {
        tail_seen = true;
        group.len() == 3 && group.chars().all(|c| c.is_ascii_digit())
    });
    head_ok && tail_seen && tail_ok
}

/// Boolean form flag that also accepts `null`, `"ja"`, `"true"`, `1` and friends.
pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(text) => matches!(
            text.trim().to_lowercase().as_str(),
            "true" | "ja" | "yes" | "1" | "x"
        ),
        _ => false,
    })
}

/// Postal address as captured by the applicant forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        [
            &self.street,
            &self.house_number,
            &self.postal_code,
            &self.city,
        ]
        .iter()
        .all(|part| part.as_deref().map(str::trim).unwrap_or("").is_empty())
    }
}

/// Household member as recorded on the main application and household forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_flag")]
    pub excluded_from_household: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub has_no_income: bool,
    pub address: Option<Address>,
    /// Grad der Behinderung (0-100).
    pub disability_grade: FormNumber,
    /// Pflegegrad (0-5).
    pub care_level: FormNumber,
}

impl PersonRecord {
    pub fn has_disability_grade_at_least(&self, threshold: u8) -> bool {
        self.disability_grade
            .value()
            .map(|grade| grade >= f64::from(threshold))
            .unwrap_or(false)
    }

    pub fn has_care_level(&self) -> bool {
        self.care_level.is_positive()
    }
}

/// Additional persons, stored either positionally (legacy) or keyed by person id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonCollection {
    List(Vec<PersonRecord>),
    Keyed(BTreeMap<String, PersonRecord>),
}

impl Default for PersonCollection {
    fn default() -> Self {
        Self::Keyed(BTreeMap::new())
    }
}

/// Free-form "other monthly net income" entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherIncomeEntry {
    #[serde(rename = "type")]
    pub income_type: String,
    pub amount: FormNumber,
}

/// Income declaration of a single applicant.
///
/// Field names follow the keys the income-declaration forms persist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialRecord {
    #[serde(rename = "personId", alias = "person_id")]
    pub person_id: Option<String>,

    #[serde(
        rename = "hassalaryincome",
        alias = "hasEmploymentIncome",
        deserialize_with = "lenient_flag"
    )]
    pub has_salary_income: bool,
    #[serde(rename = "incomesalary")]
    pub income_salary: FormNumber,
    #[serde(rename = "incomechristmasbonus")]
    pub income_christmas_bonus: FormNumber,
    #[serde(rename = "incomeholidaybonus")]
    pub income_holiday_bonus: FormNumber,
    #[serde(rename = "incomeotherbonus")]
    pub income_other_bonus: FormNumber,

    #[serde(rename = "hasrentincome", deserialize_with = "lenient_flag")]
    pub has_rent_income: bool,
    #[serde(rename = "incomerent")]
    pub income_rent: FormNumber,
    #[serde(rename = "incomerentyear")]
    pub income_rent_year: FormNumber,

    #[serde(rename = "hasbusinessincome", deserialize_with = "lenient_flag")]
    pub has_business_income: bool,
    #[serde(rename = "incomebusiness")]
    pub income_business: FormNumber,
    #[serde(rename = "incomebusinessyear")]
    pub income_business_year: FormNumber,

    #[serde(rename = "hasagricultureincome", deserialize_with = "lenient_flag")]
    pub has_agriculture_income: bool,
    #[serde(rename = "incomeagriculture")]
    pub income_agriculture: FormNumber,
    #[serde(rename = "incomeagricultureyear")]
    pub income_agriculture_year: FormNumber,

    #[serde(rename = "hascapitalincome", deserialize_with = "lenient_flag")]
    pub has_capital_income: bool,
    #[serde(rename = "incomecapital")]
    pub income_capital: FormNumber,
    #[serde(rename = "incomecapitalyear")]
    pub income_capital_year: FormNumber,

    #[serde(rename = "haspensionincome", deserialize_with = "lenient_flag")]
    pub has_pension_income: bool,
    #[serde(rename = "incomepension")]
    pub income_pension: FormNumber,

    #[serde(rename = "hasunemploymentbenefits", deserialize_with = "lenient_flag")]
    pub has_unemployment_benefits: bool,
    #[serde(rename = "incomeunemployment")]
    pub income_unemployment: FormNumber,

    #[serde(rename = "hasalimonyincome", deserialize_with = "lenient_flag")]
    pub has_alimony_income: bool,
    #[serde(rename = "incomealimony")]
    pub income_alimony: FormNumber,

    #[serde(rename = "haselterngeld", deserialize_with = "lenient_flag")]
    pub has_elterngeld: bool,
    #[serde(rename = "incomeelterngeld")]
    pub income_elterngeld: FormNumber,
    #[serde(rename = "elterngeldmonths")]
    pub elterngeld_months: FormNumber,

    #[serde(rename = "hasforeignincome", deserialize_with = "lenient_flag")]
    pub has_foreign_income: bool,
    #[serde(rename = "incomeforeign")]
    pub income_foreign: FormNumber,
    #[serde(rename = "incomeforeignyear")]
    pub income_foreign_year: FormNumber,
    #[serde(rename = "incomeforeigncurrency")]
    pub income_foreign_currency: Option<String>,

    #[serde(rename = "othermonthlynetincome")]
    pub other_monthly_net_income: Vec<OtherIncomeEntry>,

    #[serde(rename = "werbungskosten")]
    pub werbungskosten: FormNumber,
    #[serde(rename = "kinderbetreuungskosten")]
    pub kinderbetreuungskosten: FormNumber,

    #[serde(rename = "ispayingincometax", deserialize_with = "lenient_flag")]
    pub is_paying_income_tax: bool,
    #[serde(rename = "ispayinghealthinsurance", deserialize_with = "lenient_flag")]
    pub is_paying_health_insurance: bool,
    #[serde(rename = "ispayingpension", deserialize_with = "lenient_flag")]
    pub is_paying_pension: bool,

    #[serde(rename = "ispayingunterhalt", deserialize_with = "lenient_flag")]
    pub is_paying_unterhalt: bool,
    #[serde(rename = "unterhaltamount")]
    pub unterhalt_amount: FormNumber,
    #[serde(rename = "unterhaltrecipients")]
    pub unterhalt_recipients: FormNumber,
}

impl FinancialRecord {
    /// Income categories that are evidenced by a tax assessment and tax return.
    pub fn has_tax_assessed_income(&self) -> bool {
        self.has_rent_income || self.has_business_income || self.has_agriculture_income
    }

    pub fn sick_pay_entries(&self) -> impl Iterator<Item = &OtherIncomeEntry> {
        self.other_monthly_net_income
            .iter()
            .filter(|entry| super::income_labels::is_sick_pay_label(&entry.income_type))
    }

    pub fn other_income_entries(&self) -> impl Iterator<Item = &OtherIncomeEntry> {
        self.other_monthly_net_income.iter().filter(|entry| {
            !entry.income_type.trim().is_empty()
                && !super::income_labels::is_sick_pay_label(&entry.income_type)
        })
    }

    pub fn has_sick_pay(&self) -> bool {
        self.sick_pay_entries().next().is_some()
    }

    pub fn has_other_income(&self) -> bool {
        self.other_income_entries().next().is_some()
    }
}

/// Financial declarations for the main applicant and the additional persons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialDeclarations {
    pub main: FinancialRecord,
    pub additional: FinancialCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FinancialCollection {
    List(Vec<FinancialRecord>),
    Keyed(BTreeMap<String, FinancialRecord>),
}

impl Default for FinancialCollection {
    fn default() -> Self {
        Self::Keyed(BTreeMap::new())
    }
}

/// Subsidy variant chosen on the object form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoerderVariante {
    Neubau,
    NeubauWohnung,
    ErsterwerbEigenheim,
    ErsterwerbWohnung,
    BestandserwerbEigenheim,
    BestandserwerbWohnung,
    Nutzungsaenderung,
    #[serde(other)]
    Unbekannt,
}

impl FoerderVariante {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Neubau => "Neubau Eigenheim",
            Self::NeubauWohnung => "Neubau Eigentumswohnung",
            Self::ErsterwerbEigenheim => "Ersterwerb Eigenheim",
            Self::ErsterwerbWohnung => "Ersterwerb Eigentumswohnung",
            Self::BestandserwerbEigenheim => "Bestandserwerb Eigenheim",
            Self::BestandserwerbWohnung => "Bestandserwerb Eigentumswohnung",
            Self::Nutzungsaenderung => "Nutzungsänderung",
            Self::Unbekannt => "unbekannte Fördervariante",
        }
    }

    pub const fn is_neubau(self) -> bool {
        matches!(self, Self::Neubau | Self::NeubauWohnung)
    }

    pub const fn is_ersterwerb(self) -> bool {
        matches!(self, Self::ErsterwerbEigenheim | Self::ErsterwerbWohnung)
    }

    pub const fn is_bestandserwerb(self) -> bool {
        matches!(
            self,
            Self::BestandserwerbEigenheim | Self::BestandserwerbWohnung
        )
    }

    pub const fn is_erwerb(self) -> bool {
        self.is_ersterwerb() || self.is_bestandserwerb()
    }

    pub const fn is_nutzungsaenderung(self) -> bool {
        matches!(self, Self::Nutzungsaenderung)
    }
}

/// Property data from the object form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectRecord {
    pub foerder_variante: Option<FoerderVariante>,
    /// The applicant already owns the plot or object.
    #[serde(deserialize_with = "lenient_flag")]
    pub eigentumsverhaeltnis: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub erbbaurecht: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub barrierefrei: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub bergsenkungsgebiet: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub holzbau: bool,
    #[serde(deserialize_with = "lenient_flag")]
    pub effizienzhaus40: bool,
    pub wohnflaeche: FormNumber,
    pub baujahr: FormNumber,
    pub address: Option<Address>,
    pub grundbuch_blatt: Option<String>,
    pub erbbaurecht_restlaufzeit: FormNumber,
}

/// Loan taken from a third-party lender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalLoan {
    pub lender: Option<String>,
    pub principal: FormNumber,
    pub interest_rate: FormNumber,
}

impl ExternalLoan {
    pub fn is_declared(&self) -> bool {
        self.principal.is_positive()
            || self
                .lender
                .as_deref()
                .map(|lender| !lender.trim().is_empty())
                .unwrap_or(false)
    }
}

/// Supplementary subsidy loans ("Zusatzdarlehen") requested on top of the base loan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupplementaryLoans {
    pub familienbonus: FormNumber,
    pub barrierefreiheit: FormNumber,
    pub bergsenkung: FormNumber,
    pub standortbedingte_mehrkosten: FormNumber,
    pub bauen_mit_holz: FormNumber,
    pub effizienzhaus40: FormNumber,
}

/// Loan and equity data from the finance-structure form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinanceStructureRecord {
    pub grunddarlehen: FormNumber,
    pub eigenkapital: FormNumber,
    pub eigenleistung: FormNumber,
    pub fremddarlehen: Vec<ExternalLoan>,
    pub zusatzdarlehen: SupplementaryLoans,
}

impl FinanceStructureRecord {
    pub fn has_external_loans(&self) -> bool {
        self.fremddarlehen.iter().any(ExternalLoan::is_declared)
    }
}

/// Cost totals from the cost-structure form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CostStructureRecord {
    pub kaufpreis: FormNumber,
    pub grundstueckskosten: FormNumber,
    pub baukosten: FormNumber,
    pub baunebenkosten: FormNumber,
    pub standortbedingte_mehrkosten: FormNumber,
    pub gesamtkosten: FormNumber,
}

/// One uploaded evidence file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(deserialize_with = "lenient_flag")]
    pub uploaded: bool,
    pub file_name: Option<String>,
    pub storage_path: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// `applicantKey -> documentTypeId -> files`, read-only to the checklist engine.
///
/// Document type ids stay raw strings so unknown legacy types do not break decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentStore(pub BTreeMap<String, BTreeMap<String, Vec<UploadedFile>>>);

impl DocumentStore {
    pub fn files(&self, applicant_key: &str, document_type: &str) -> &[UploadedFile] {
        self.0
            .get(applicant_key)
            .and_then(|documents| documents.get(document_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn document_types(&self, applicant_key: &str) -> impl Iterator<Item = &str> {
        self.0
            .get(applicant_key)
            .into_iter()
            .flat_map(|documents| documents.keys().map(String::as_str))
    }
}

/// Core application record. Failing to fetch it aborts checklist generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationCore {
    pub main_applicant: PersonRecord,
    pub additional_applicants: PersonCollection,
    pub child_count: u32,
    pub documents: DocumentStore,
}

/// Upstream form whose completeness is reported verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSection {
    Hauptantrag,
    Einkommenserklaerung,
    Selbstauskunft,
    Haushaltsauskunft,
    Objektdaten,
    Finanzierungsstruktur,
    Kostenstruktur,
    Dokumente,
}

impl FormSection {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Hauptantrag,
            Self::Einkommenserklaerung,
            Self::Selbstauskunft,
            Self::Haushaltsauskunft,
            Self::Objektdaten,
            Self::Finanzierungsstruktur,
            Self::Kostenstruktur,
            Self::Dokumente,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hauptantrag => "hauptantrag",
            Self::Einkommenserklaerung => "einkommenserklaerung",
            Self::Selbstauskunft => "selbstauskunft",
            Self::Haushaltsauskunft => "haushaltsauskunft",
            Self::Objektdaten => "objektdaten",
            Self::Finanzierungsstruktur => "finanzierungsstruktur",
            Self::Kostenstruktur => "kostenstruktur",
            Self::Dokumente => "dokumente",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hauptantrag => "Hauptantrag",
            Self::Einkommenserklaerung => "Einkommenserklärung",
            Self::Selbstauskunft => "Selbstauskunft",
            Self::Haushaltsauskunft => "Haushaltsauskunft",
            Self::Objektdaten => "Objektdaten",
            Self::Finanzierungsstruktur => "Finanzierungsstruktur",
            Self::Kostenstruktur => "Kostenstruktur",
            Self::Dokumente => "Dokumente",
        }
    }
}

/// Percent-complete figure reported by one upstream form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProgress {
    pub form: FormSection,
    pub percent: u8,
}

/// Everything the engine reads for one application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChecklistSnapshot {
    pub application: ApplicationCore,
    pub financials: FinancialDeclarations,
    pub object: ObjectRecord,
    pub finance_structure: FinanceStructureRecord,
    pub cost_structure: CostStructureRecord,
    pub form_progress: Vec<FormProgress>,
}

/// Whether an applicant is the main applicant or an additional household member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantRole {
    Main,
    Additional,
}

/// Household member under evaluation during one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantIdentity {
    pub key: String,
    pub display_name: String,
    pub role: ApplicantRole,
    pub person_id: Option<String>,
}

/// Machine-computed verdict of a checklist item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Correct,
    Wrong,
    #[default]
    Undefined,
}

/// Reviewer verdict of a checklist item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Correct,
    Wrong,
    #[default]
    Undefined,
    Created,
}

/// Reviewer who last changed the agent status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSetBy {
    pub reviewer: String,
    pub at: DateTime<Utc>,
}

/// One reviewable finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub system_status: SystemStatus,
    #[serde(default)]
    pub agent_status: AgentStatus,
    #[serde(default)]
    pub system_comment: String,
    #[serde(default)]
    pub system_errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_warnings: Option<Vec<String>>,
    #[serde(default)]
    pub linked_forms: Vec<String>,
    #[serde(default)]
    pub linked_docs: Vec<String>,
    #[serde(default)]
    pub agent_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_set_by: Option<StatusSetBy>,
}

impl ChecklistItem {
    /// Fresh item with default reviewer fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: SystemStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            system_status: status,
            agent_status: AgentStatus::Undefined,
            system_comment: String::new(),
            system_errors: Vec::new(),
            system_warnings: None,
            linked_forms: Vec::new(),
            linked_docs: Vec::new(),
            agent_notes: None,
            status_set_by: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.system_comment = comment.into();
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.system_errors = errors;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.system_warnings = if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        };
        self
    }

    pub fn with_forms(mut self, forms: &[FormSection]) -> Self {
        self.linked_forms = forms.iter().map(|form| form.as_str().to_string()).collect();
        self
    }

    pub fn with_docs(mut self, docs: Vec<String>) -> Self {
        self.linked_docs = docs;
        self
    }

    /// Apply a reviewer edit; system fields are left untouched.
    pub fn apply_review(&mut self, update: &ReviewerUpdate, at: DateTime<Utc>) {
        if let Some(status) = update.agent_status {
            self.agent_status = status;
            self.status_set_by = Some(StatusSetBy {
                reviewer: update.reviewer.clone(),
                at,
            });
        }
        if let Some(notes) = &update.agent_notes {
            let trimmed = notes.trim();
            self.agent_notes = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
    }
}

/// Reviewer action on a single checklist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerUpdate {
    pub reviewer: String,
    #[serde(default)]
    pub agent_status: Option<AgentStatus>,
    #[serde(default)]
    pub agent_notes: Option<String>,
}

impl ReviewerUpdate {
    pub fn is_empty(&self) -> bool {
        self.agent_status.is_none() && self.agent_notes.is_none()
    }
}

/// Persisted checklist document for one application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredChecklist {
    pub checklist_items: Vec<ChecklistItem>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl StoredChecklist {
    pub const INITIAL_STATUS: &'static str = "in_review";

    pub fn item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.checklist_items.iter().find(|item| item.id == item_id)
    }
}
