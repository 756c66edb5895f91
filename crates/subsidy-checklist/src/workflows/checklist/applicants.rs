use super::domain::{ApplicantIdentity, ApplicantRole, PersonRecord};
use super::normalizer::{NormalizedHousehold, MAIN_KEY};

pub const MAIN_APPLICANT_LABEL: &str = "Hauptantragsteller/in";

/// Household members to evaluate, main applicant first.
///
/// Persons excluded from the household are skipped entirely; persons without income
/// are kept because disability and care-level evidence still applies to them.
pub fn enumerate(household: &NormalizedHousehold) -> Vec<ApplicantIdentity> {
    let mut applicants = vec![ApplicantIdentity {
        key: MAIN_KEY.to_string(),
        display_name: MAIN_APPLICANT_LABEL.to_string(),
        role: ApplicantRole::Main,
        person_id: None,
    }];

    for (position, entry) in household.persons.iter().enumerate() {
        if entry.person.excluded_from_household {
            continue;
        }
        // Main applicant is person 1.
        let ordinal = position + 2;
        applicants.push(ApplicantIdentity {
            key: applicant_key(&entry.key),
            display_name: display_name(&entry.person, ordinal),
            role: ApplicantRole::Additional,
            person_id: Some(entry.key.clone()),
        });
    }

    applicants
}

pub fn applicant_key(person_id: &str) -> String {
    format!("additional:{person_id}")
}

/// Masked label such as "Ma. M." so checklist titles do not carry full names.
fn display_name(person: &PersonRecord, ordinal: usize) -> String {
    let given = person.first_name.as_deref().map(str::trim).unwrap_or("");
    let family = person.last_name.as_deref().map(str::trim).unwrap_or("");

    if given.is_empty() || family.is_empty() {
        return format!("Person {ordinal}");
    }

    let given_prefix: String = given.chars().take(2).collect();
    let family_initial: String = family.chars().take(1).collect();
    format!("{given_prefix}. {family_initial}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::checklist::normalizer::KeyedPerson;

    fn member(key: &str, first: Option<&str>, last: Option<&str>) -> KeyedPerson {
        KeyedPerson {
            key: key.to_string(),
            person: PersonRecord {
                first_name: first.map(str::to_string),
                last_name: last.map(str::to_string),
                ..PersonRecord::default()
            },
        }
    }

    #[test]
    fn main_applicant_comes_first_with_fixed_label() {
        let applicants = enumerate(&NormalizedHousehold::default());

        assert_eq!(applicants.len(), 1);
        assert_eq!(applicants[0].key, "main");
        assert_eq!(applicants[0].display_name, MAIN_APPLICANT_LABEL);
        assert_eq!(applicants[0].role, ApplicantRole::Main);
    }

    #[test]
    fn masks_names_and_falls_back_to_ordinals() {
        let household = NormalizedHousehold {
            persons: vec![
                member("p-1", Some("Marie"), Some("Müller")),
                member("p-2", Some("Jonas"), None),
            ],
            ..NormalizedHousehold::default()
        };

        let applicants = enumerate(&household);

        assert_eq!(applicants[1].key, "additional:p-1");
        assert_eq!(applicants[1].display_name, "Ma. M.");
        assert_eq!(applicants[2].display_name, "Person 3");
    }

    #[test]
    fn excluded_persons_are_skipped_but_no_income_persons_are_kept() {
        let mut excluded = member("p-1", Some("Eva"), Some("Ernst"));
        excluded.person.excluded_from_household = true;
        let mut without_income = member("p-2", Some("Ole"), Some("Otto"));
        without_income.person.has_no_income = true;

        let household = NormalizedHousehold {
            persons: vec![excluded, without_income],
            ..NormalizedHousehold::default()
        };

        let keys: Vec<String> = enumerate(&household)
            .into_iter()
            .map(|identity| identity.key)
            .collect();
        assert_eq!(keys, vec!["main", "additional:p-2"]);
    }
}
