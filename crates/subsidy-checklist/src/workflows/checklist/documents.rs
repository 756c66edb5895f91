use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::DocumentStore;

/// Applicant key under which all `general` documents are stored.
pub const GENERAL_KEY: &str = "general";

/// Storage scope of a document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    General,
    Applicant,
}

/// Every class of evidentiary document the checklist knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentTypeId {
    // General documents.
    Meldebescheinigung,
    EigenkapitalNachweis,
    Bauzeichnung,
    Lageplan,
    Grundbuchblattkopie,
    Baugenehmigung,
    BerechnungWohnflaeche,
    Kaufvertrag,
    Erbbaurechtsvertrag,
    NachweisBarrierefreiheit,
    BergsenkungsgebietErklaerung,
    NachweisStandortbedingteMehrkosten,
    NachweisHolzbau,
    NachweisEffizienzhaus40,
    Darlehenszusagen,
    SonstigeDokumente,
    // Applicant documents.
    LohnGehaltsbescheinigungen,
    Einkommenssteuerbescheid,
    Einkommenssteuererklaerung,
    GewinnVerlustRechnung,
    KapitalertraegeNachweis,
    Rentenbescheid,
    Arbeitslosengeldbescheid,
    Krankengeldnachweis,
    SonstigeEinkommensnachweise,
    Unterhaltsnachweis,
    Unterhaltsverpflichtung,
    Elterngeldbescheid,
    AuslaendischeEinkuenfte,
    WerbungskostenNachweis,
    KinderbetreuungskostenNachweis,
    Schwerbehindertenausweis,
    Pflegegradnachweis,
    FreiwilligeKrankenversicherung,
    FreiwilligeRentenversicherung,
}

impl DocumentTypeId {
    pub const fn all() -> [Self; 35] {
        [
            Self::Meldebescheinigung,
            Self::EigenkapitalNachweis,
            Self::Bauzeichnung,
            Self::Lageplan,
            Self::Grundbuchblattkopie,
            Self::Baugenehmigung,
            Self::BerechnungWohnflaeche,
            Self::Kaufvertrag,
            Self::Erbbaurechtsvertrag,
            Self::NachweisBarrierefreiheit,
            Self::BergsenkungsgebietErklaerung,
            Self::NachweisStandortbedingteMehrkosten,
            Self::NachweisHolzbau,
            Self::NachweisEffizienzhaus40,
            Self::Darlehenszusagen,
            Self::SonstigeDokumente,
            Self::LohnGehaltsbescheinigungen,
            Self::Einkommenssteuerbescheid,
            Self::Einkommenssteuererklaerung,
            Self::GewinnVerlustRechnung,
            Self::KapitalertraegeNachweis,
            Self::Rentenbescheid,
            Self::Arbeitslosengeldbescheid,
            Self::Krankengeldnachweis,
            Self::SonstigeEinkommensnachweise,
            Self::Unterhaltsnachweis,
            Self::Unterhaltsverpflichtung,
            Self::Elterngeldbescheid,
            Self::AuslaendischeEinkuenfte,
            Self::WerbungskostenNachweis,
            Self::KinderbetreuungskostenNachweis,
            Self::Schwerbehindertenausweis,
            Self::Pflegegradnachweis,
            Self::FreiwilligeKrankenversicherung,
            Self::FreiwilligeRentenversicherung,
        ]
    }

    /// Stable identifier used in the document store and in reference ids.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meldebescheinigung => "meldebescheinigung",
            Self::EigenkapitalNachweis => "eigenkapital_nachweis",
            Self::Bauzeichnung => "bauzeichnung",
            Self::Lageplan => "lageplan",
            Self::Grundbuchblattkopie => "grundbuchblattkopie",
            Self::Baugenehmigung => "baugenehmigung",
            Self::BerechnungWohnflaeche => "berechnung_wohnflaeche",
            Self::Kaufvertrag => "kaufvertrag",
            Self::Erbbaurechtsvertrag => "erbbaurechtsvertrag",
            Self::NachweisBarrierefreiheit => "nachweis_barrierefreiheit",
            Self::BergsenkungsgebietErklaerung => "bergsenkungsgebiet_erklaerung",
            Self::NachweisStandortbedingteMehrkosten => "nachweis_standortbedingte_mehrkosten",
            Self::NachweisHolzbau => "nachweis_holzbau",
            Self::NachweisEffizienzhaus40 => "nachweis_effizienzhaus40",
            Self::Darlehenszusagen => "darlehenszusagen",
            Self::SonstigeDokumente => "sonstige_dokumente",
            Self::LohnGehaltsbescheinigungen => "lohn_gehaltsbescheinigungen",
            Self::Einkommenssteuerbescheid => "einkommenssteuerbescheid",
            Self::Einkommenssteuererklaerung => "einkommenssteuererklaerung",
            Self::GewinnVerlustRechnung => "gewinn_verlust_rechnung",
            Self::KapitalertraegeNachweis => "kapitalertraege_nachweis",
            Self::Rentenbescheid => "rentenbescheid",
            Self::Arbeitslosengeldbescheid => "arbeitslosengeldbescheid",
            Self::Krankengeldnachweis => "krankengeldnachweis",
            Self::SonstigeEinkommensnachweise => "sonstige_einkommensnachweise",
            Self::Unterhaltsnachweis => "unterhaltsnachweis",
            Self::Unterhaltsverpflichtung => "unterhaltsverpflichtung",
            Self::Elterngeldbescheid => "elterngeldbescheid",
            Self::AuslaendischeEinkuenfte => "auslaendische_einkuenfte",
            Self::WerbungskostenNachweis => "werbungskosten_nachweis",
            Self::KinderbetreuungskostenNachweis => "kinderbetreuungskosten_nachweis",
            Self::Schwerbehindertenausweis => "schwerbehindertenausweis",
            Self::Pflegegradnachweis => "pflegegradnachweis",
            Self::FreiwilligeKrankenversicherung => "freiwillige_krankenversicherung",
            Self::FreiwilligeRentenversicherung => "freiwillige_rentenversicherung",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Meldebescheinigung => "Meldebescheinigung",
            Self::EigenkapitalNachweis => "Nachweis Eigenkapital",
            Self::Bauzeichnung => "Bauzeichnung",
            Self::Lageplan => "Lageplan",
            Self::Grundbuchblattkopie => "Grundbuchblattkopie",
            Self::Baugenehmigung => "Baugenehmigung / Bauanzeige",
            Self::BerechnungWohnflaeche => "Berechnung der Wohn- und Nutzfläche",
            Self::Kaufvertrag => "Kaufvertrag",
            Self::Erbbaurechtsvertrag => "Erbbaurechtsvertrag",
            Self::NachweisBarrierefreiheit => "Nachweis Barrierefreiheit",
            Self::BergsenkungsgebietErklaerung => "Erklärung Bergsenkungsgebiet",
            Self::NachweisStandortbedingteMehrkosten => "Nachweis standortbedingte Mehrkosten",
            Self::NachweisHolzbau => "Nachweis Bauen mit Holz",
            Self::NachweisEffizienzhaus40 => "Nachweis Effizienzhaus 40",
            Self::Darlehenszusagen => "Darlehenszusagen",
            Self::SonstigeDokumente => "Sonstige Dokumente",
            Self::LohnGehaltsbescheinigungen => "Lohn-/Gehaltsbescheinigungen",
            Self::Einkommenssteuerbescheid => "Einkommenssteuerbescheid",
            Self::Einkommenssteuererklaerung => "Einkommenssteuererklärung",
            Self::GewinnVerlustRechnung => "Gewinn- und Verlustrechnung",
            Self::KapitalertraegeNachweis => "Nachweis Kapitalerträge",
            Self::Rentenbescheid => "Rentenbescheid",
            Self::Arbeitslosengeldbescheid => "Arbeitslosengeldbescheid",
            Self::Krankengeldnachweis => "Krankengeldnachweis",
            Self::SonstigeEinkommensnachweise => "Sonstige Einkommensnachweise",
            Self::Unterhaltsnachweis => "Nachweis erhaltener Unterhalt",
            Self::Unterhaltsverpflichtung => "Nachweis Unterhaltsverpflichtung",
            Self::Elterngeldbescheid => "Elterngeldbescheid",
            Self::AuslaendischeEinkuenfte => "Nachweis ausländische Einkünfte",
            Self::WerbungskostenNachweis => "Nachweis Werbungskosten",
            Self::KinderbetreuungskostenNachweis => "Nachweis Kinderbetreuungskosten",
            Self::Schwerbehindertenausweis => "Schwerbehindertenausweis",
            Self::Pflegegradnachweis => "Nachweis Pflegegrad",
            Self::FreiwilligeKrankenversicherung => "Nachweis freiwillige Krankenversicherung",
            Self::FreiwilligeRentenversicherung => "Nachweis freiwillige Rentenversicherung",
        }
    }

    /// Fixed storage scope; the only source of truth for category remapping.
    pub const fn category(self) -> DocumentCategory {
        match self {
            Self::Meldebescheinigung
            | Self::EigenkapitalNachweis
            | Self::Bauzeichnung
            | Self::Lageplan
            | Self::Grundbuchblattkopie
            | Self::Baugenehmigung
            | Self::BerechnungWohnflaeche
            | Self::Kaufvertrag
            | Self::Erbbaurechtsvertrag
            | Self::NachweisBarrierefreiheit
            | Self::BergsenkungsgebietErklaerung
            | Self::NachweisStandortbedingteMehrkosten
            | Self::NachweisHolzbau
            | Self::NachweisEffizienzhaus40
            | Self::Darlehenszusagen
            | Self::SonstigeDokumente => DocumentCategory::General,
            Self::LohnGehaltsbescheinigungen
            | Self::Einkommenssteuerbescheid
            | Self::Einkommenssteuererklaerung
            | Self::GewinnVerlustRechnung
            | Self::KapitalertraegeNachweis
            | Self::Rentenbescheid
            | Self::Arbeitslosengeldbescheid
            | Self::Krankengeldnachweis
            | Self::SonstigeEinkommensnachweise
            | Self::Unterhaltsnachweis
            | Self::Unterhaltsverpflichtung
            | Self::Elterngeldbescheid
            | Self::AuslaendischeEinkuenfte
            | Self::WerbungskostenNachweis
            | Self::KinderbetreuungskostenNachweis
            | Self::Schwerbehindertenausweis
            | Self::Pflegegradnachweis
            | Self::FreiwilligeKrankenversicherung
            | Self::FreiwilligeRentenversicherung => DocumentCategory::Applicant,
        }
    }
}

impl fmt::Display for DocumentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document type '{0}'")]
pub struct UnknownDocumentType(pub String);

impl FromStr for DocumentTypeId {
    type Err = UnknownDocumentType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|document| document.as_str() == value)
            .ok_or_else(|| UnknownDocumentType(value.to_string()))
    }
}

impl Serialize for DocumentTypeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentTypeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn category_of(document: DocumentTypeId) -> DocumentCategory {
    document.category()
}

/// Maps the requesting applicant key to the key the document is stored under.
pub fn resolve_key(document: DocumentTypeId, requested_key: &str) -> &str {
    match category_of(document) {
        DocumentCategory::General => GENERAL_KEY,
        DocumentCategory::Applicant => requested_key,
    }
}

/// Read-only view answering "what was uploaded" questions against a document store.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceIndex<'a> {
    store: &'a DocumentStore,
}

impl<'a> EvidenceIndex<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    pub fn is_satisfied(&self, document: DocumentTypeId, applicant_key: &str) -> bool {
        self.file_count(document, applicant_key) > 0
    }

    pub fn file_count(&self, document: DocumentTypeId, applicant_key: &str) -> usize {
        let key = resolve_key(document, applicant_key);
        self.store
            .files(key, document.as_str())
            .iter()
            .filter(|file| file.uploaded)
            .count()
    }

    /// `<key>_<type>_<index>` for each uploaded file, indexed among uploaded files only.
    pub fn file_refs(&self, document: DocumentTypeId, applicant_key: &str) -> Vec<String> {
        let key = resolve_key(document, applicant_key);
        self.store
            .files(key, document.as_str())
            .iter()
            .filter(|file| file.uploaded)
            .enumerate()
            .map(|(index, _)| format!("{key}_{}_{index}", document.as_str()))
            .collect()
    }

    /// Known document types with at least one uploaded file stored under `key`.
    ///
    /// Only types whose category matches the key are reported, so general documents
    /// filed under an applicant key are ignored just like every other lookup does.
    pub fn uploaded_types(&self, key: &str) -> Vec<DocumentTypeId> {
        let expected = if key == GENERAL_KEY {
            DocumentCategory::General
        } else {
            DocumentCategory::Applicant
        };

        let mut types: Vec<DocumentTypeId> = self
            .store
            .document_types(key)
            .filter_map(|raw| match raw.parse::<DocumentTypeId>() {
                Ok(document) => Some(document),
                Err(err) => {
                    tracing::debug!(applicant_key = key, %err, "ignoring unknown document type");
                    None
                }
            })
            .filter(|document| document.category() == expected)
            .filter(|document| self.is_satisfied(*document, key))
            .collect();
        types.sort();
        types
    }
}
