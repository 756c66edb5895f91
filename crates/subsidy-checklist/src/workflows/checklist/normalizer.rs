use std::collections::{BTreeMap, BTreeSet};

use super::domain::{
    ApplicantIdentity, ApplicantRole, ApplicationCore, FinancialCollection, FinancialDeclarations,
    FinancialRecord, PersonCollection, PersonRecord,
};

/// Applicant key of the main applicant.
pub const MAIN_KEY: &str = "main";

/// Additional household member with the stable key assigned during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedPerson {
    pub key: String,
    pub person: PersonRecord,
}

/// Identity-keyed view of the household, produced once at the boundary.
///
/// Person keys are unique and every one of them has exactly one financial record.
/// The main applicant lives outside that key space, so no additional person can
/// shadow it whatever id they carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedHousehold {
    pub main: PersonRecord,
    pub main_financial: FinancialRecord,
    pub persons: Vec<KeyedPerson>,
    pub financials: BTreeMap<String, FinancialRecord>,
}

impl NormalizedHousehold {
    pub fn person(&self, identity: &ApplicantIdentity) -> Option<&PersonRecord> {
        match identity.role {
            ApplicantRole::Main => Some(&self.main),
            ApplicantRole::Additional => {
                let person_id = identity.person_id.as_deref()?;
                self.persons
                    .iter()
                    .find(|entry| entry.key == person_id)
                    .map(|entry| &entry.person)
            }
        }
    }

    pub fn financial(&self, identity: &ApplicantIdentity) -> Option<&FinancialRecord> {
        match identity.role {
            ApplicantRole::Main => Some(&self.main_financial),
            ApplicantRole::Additional => self.financials.get(identity.person_id.as_deref()?),
        }
    }
}

pub fn normalize(
    application: &ApplicationCore,
    declarations: &FinancialDeclarations,
) -> NormalizedHousehold {
    let persons = normalize_persons(&application.additional_applicants);
    let financials = normalize_financials(&persons, declarations);

    NormalizedHousehold {
        main: application.main_applicant.clone(),
        main_financial: declarations.main.clone(),
        persons,
        financials,
    }
}

/// Keys list-shaped persons by their own id, falling back to `legacy_<index>` when the
/// id is missing or already taken by an earlier person.
pub fn normalize_persons(collection: &PersonCollection) -> Vec<KeyedPerson> {
    match collection {
        PersonCollection::List(records) => {
            let mut taken: BTreeSet<String> = BTreeSet::new();
            records
                .iter()
                .enumerate()
                .map(|(index, person)| {
                    let own = own_id(person.id.as_deref());
                    let key = match own {
                        Some(id) if !taken.contains(&id) => id,
                        Some(id) => {
                            let key = free_legacy_key(index, &taken);
                            tracing::debug!(%id, %key, "re-keying person with duplicate id");
                            key
                        }
                        None => free_legacy_key(index, &taken),
                    };
                    taken.insert(key.clone());
                    KeyedPerson {
                        key,
                        person: person.clone(),
                    }
                })
                .collect()
        }
        PersonCollection::Keyed(records) => records
            .iter()
            .map(|(key, person)| KeyedPerson {
                key: key.clone(),
                person: person.clone(),
            })
            .collect(),
    }
}

fn normalize_financials(
    persons: &[KeyedPerson],
    declarations: &FinancialDeclarations,
) -> BTreeMap<String, FinancialRecord> {
    let mut by_key: BTreeMap<String, FinancialRecord> = match &declarations.additional {
        FinancialCollection::List(records) => {
            let mut by_key: BTreeMap<String, FinancialRecord> = BTreeMap::new();
            for (index, record) in records.iter().enumerate() {
                // A repeated person id belongs to the person re-keyed at the same position.
                let key = own_id(record.person_id.as_deref())
                    .filter(|id| !by_key.contains_key(id))
                    .or_else(|| persons.get(index).map(|entry| entry.key.clone()))
                    .filter(|key| !by_key.contains_key(key))
                    .unwrap_or_else(|| legacy_key(index));
                by_key.insert(key, record.clone());
            }
            by_key
        }
        FinancialCollection::Keyed(records) => records.clone(),
    };

    let mut financials = BTreeMap::new();
    for entry in persons {
        let record = by_key.remove(&entry.key).unwrap_or_default();
        financials.insert(entry.key.clone(), record);
    }

    for orphan in by_key.keys() {
        tracing::debug!(key = %orphan, "dropping financial record without matching person");
    }

    financials
}

fn own_id(id: Option<&str>) -> Option<String> {
    id.map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn legacy_key(index: usize) -> String {
    format!("legacy_{index}")
}

fn free_legacy_key(index: usize, taken: &BTreeSet<String>) -> String {
    let base = legacy_key(index);
    if !taken.contains(&base) {
        return base;
    }
    (1..)
        .map(|suffix| format!("{base}_{suffix}"))
        .find(|key| !taken.contains(key))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::checklist::domain::FormNumber;

    fn named(id: Option<&str>, first: &str) -> PersonRecord {
        PersonRecord {
            id: id.map(str::to_string),
            first_name: Some(first.to_string()),
            ..PersonRecord::default()
        }
    }

    #[test]
    fn list_persons_use_own_id_or_legacy_key() {
        let persons = normalize_persons(&PersonCollection::List(vec![
            named(Some("p-1"), "Anna"),
            named(None, "Ben"),
            named(Some("  "), "Cara"),
        ]));

        let keys: Vec<&str> = persons.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["p-1", "legacy_1", "legacy_2"]);
    }

    #[test]
    fn list_financials_follow_person_positions() {
        let application = ApplicationCore {
            additional_applicants: PersonCollection::List(vec![
                named(Some("p-1"), "Anna"),
                named(None, "Ben"),
            ]),
            ..ApplicationCore::default()
        };
        let declarations = FinancialDeclarations {
            main: FinancialRecord::default(),
            additional: FinancialCollection::List(vec![
                FinancialRecord {
                    income_pension: FormNumber::new(900.0),
                    ..FinancialRecord::default()
                },
                FinancialRecord {
                    income_rent: FormNumber::new(300.0),
                    ..FinancialRecord::default()
                },
            ]),
        };

        let household = normalize(&application, &declarations);

        assert_eq!(
            household.financials["p-1"].income_pension,
            FormNumber::new(900.0)
        );
        assert_eq!(
            household.financials["legacy_1"].income_rent,
            FormNumber::new(300.0)
        );
    }

    #[test]
    fn every_person_gets_a_financial_record_and_orphans_are_dropped() {
        let mut keyed_persons = BTreeMap::new();
        keyed_persons.insert("p-1".to_string(), named(Some("p-1"), "Anna"));
        let mut keyed_financials = BTreeMap::new();
        keyed_financials.insert("ghost".to_string(), FinancialRecord::default());

        let application = ApplicationCore {
            additional_applicants: PersonCollection::Keyed(keyed_persons),
            ..ApplicationCore::default()
        };
        let declarations = FinancialDeclarations {
            main: FinancialRecord::default(),
            additional: FinancialCollection::Keyed(keyed_financials),
        };

        let household = normalize(&application, &declarations);

        let keys: Vec<&str> = household.financials.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["p-1"]);
    }

    #[test]
    fn repeated_person_ids_get_distinct_keys() {
        let persons = normalize_persons(&PersonCollection::List(vec![
            named(Some("p-1"), "Anna"),
            named(Some("p-1"), "Ben"),
            named(Some("legacy_1"), "Cara"),
        ]));

        let keys: Vec<&str> = persons.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["p-1", "legacy_1", "legacy_2"]);
        assert_eq!(persons[1].person.first_name.as_deref(), Some("Ben"));
    }

    #[test]
    fn repeated_financial_ids_follow_the_re_keyed_person() {
        let application = ApplicationCore {
            additional_applicants: PersonCollection::List(vec![
                named(Some("p-1"), "Anna"),
                named(Some("p-1"), "Ben"),
            ]),
            ..ApplicationCore::default()
        };
        let declarations = FinancialDeclarations {
            main: FinancialRecord::default(),
            additional: FinancialCollection::List(vec![
                FinancialRecord {
                    person_id: Some("p-1".to_string()),
                    income_pension: FormNumber::new(900.0),
                    ..FinancialRecord::default()
                },
                FinancialRecord {
                    person_id: Some("p-1".to_string()),
                    income_rent: FormNumber::new(300.0),
                    ..FinancialRecord::default()
                },
            ]),
        };

        let household = normalize(&application, &declarations);

        assert_eq!(
            household.financials["p-1"].income_pension,
            FormNumber::new(900.0)
        );
        assert_eq!(
            household.financials["legacy_1"].income_rent,
            FormNumber::new(300.0)
        );
    }

    #[test]
    fn a_person_called_main_cannot_shadow_the_main_applicant() {
        let mut keyed_financials = BTreeMap::new();
        keyed_financials.insert(
            "main".to_string(),
            FinancialRecord {
                income_rent: FormNumber::new(250.0),
                ..FinancialRecord::default()
            },
        );
        let application = ApplicationCore {
            additional_applicants: PersonCollection::List(vec![named(Some("main"), "Mara")]),
            ..ApplicationCore::default()
        };
        let declarations = FinancialDeclarations {
            main: FinancialRecord {
                has_pension_income: true,
                income_pension: FormNumber::new(1400.0),
                ..FinancialRecord::default()
            },
            additional: FinancialCollection::Keyed(keyed_financials),
        };

        let household = normalize(&application, &declarations);

        assert!(household.main_financial.has_pension_income);
        assert_eq!(
            household.main_financial.income_pension,
            FormNumber::new(1400.0)
        );
        assert_eq!(
            household.financials["main"].income_rent,
            FormNumber::new(250.0)
        );
    }

    #[test]
    fn accepts_both_json_shapes() {
        let listed: PersonCollection =
            serde_json::from_str(r#"[{"firstName":"Anna"}]"#).expect("list shape");
        let keyed: PersonCollection =
            serde_json::from_str(r#"{"p-9":{"firstName":"Anna"}}"#).expect("map shape");

        assert_eq!(normalize_persons(&listed)[0].key, "legacy_0");
        assert_eq!(normalize_persons(&keyed)[0].key, "p-9");
    }
}
