use super::common::*;

use crate::workflows::checklist::documents::{DocumentTypeId, GENERAL_KEY};
use crate::workflows::checklist::domain::{AgentStatus, ChecklistItem, SystemStatus};
use crate::workflows::checklist::synthesis::DOCUMENT_COMPLETENESS_ID;
use crate::workflows::checklist::{merge, DataSource, FetchDegradation, MergeMode};

fn position(items: &[ChecklistItem], id: &str) -> usize {
    items
        .iter()
        .position(|item| item.id == id)
        .unwrap_or_else(|| panic!("missing item {id}"))
}

#[test]
fn sections_follow_the_fixed_checklist_order() {
    let mut snapshot = with_rent_income(new_build_snapshot());
    snapshot.finance_structure.zusatzdarlehen.bauen_mit_holz =
        crate::workflows::checklist::FormNumber::new(10_000.0);
    upload(&mut snapshot, "main", DocumentTypeId::Rentenbescheid, 1);
    let mut run = input(snapshot);
    run.degradations = vec![FetchDegradation {
        source: DataSource::FormProgress,
        message: "data source unavailable: timeout".to_string(),
    }];

    let items = generator().generate(&run);

    let order = [
        "einkommenssteuerbescheid_main",
        "meldebescheinigung",
        "formular_hauptantrag",
        DOCUMENT_COMPLETENESS_ID,
        "zusatzdokument_main_rentenbescheid",
        "haushaltseinkommen",
        "darlehensgrenze_bauen_mit_holz",
        "datenquelle_formularstatus",
    ];
    let positions: Vec<usize> = order.iter().map(|id| position(&items, id)).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();

    assert_eq!(positions, sorted);
    assert_eq!(items.last().map(|item| item.id.as_str()), Some("datenquelle_formularstatus"));
}

#[test]
fn document_completeness_lists_missing_documents_per_bucket() {
    let mut snapshot = with_rent_income(mixed_household_snapshot());
    upload(&mut snapshot, "main", DocumentTypeId::Einkommenssteuerbescheid, 1);
    upload(&mut snapshot, "main", DocumentTypeId::Einkommenssteuererklaerung, 1);

    let items = generator().generate(&input(snapshot));
    let overview = item(&items, DOCUMENT_COMPLETENESS_ID);

    assert_eq!(overview.system_status, SystemStatus::Wrong);
    assert!(overview
        .system_errors
        .contains(&"Dokument fehlt: Schwerbehindertenausweis (Gr. L.)".to_string()));
    assert!(overview
        .system_errors
        .contains(&"Dokument fehlt: Meldebescheinigung (Allgemeine Dokumente)".to_string()));
    assert!(!overview
        .system_errors
        .iter()
        .any(|error| error.contains("Hauptantragsteller/in")));
    assert!(overview
        .system_comment
        .contains("- Hauptantragsteller/in: 2 von 2 Pflichtdokumenten vorhanden (2 Dateien)"));
}

#[test]
fn document_completeness_passes_when_everything_is_uploaded() {
    let mut snapshot = new_build_snapshot();
    let required = generator().required_documents(&snapshot);
    for document in required.general.clone() {
        upload(&mut snapshot, GENERAL_KEY, document, 1);
    }

    let items = generator().generate(&input(snapshot));

    assert_eq!(
        item(&items, DOCUMENT_COMPLETENESS_ID).system_status,
        SystemStatus::Correct
    );
}

#[test]
fn unrequested_uploads_become_informational_items() {
    let mut snapshot = new_build_snapshot();
    upload(&mut snapshot, "main", DocumentTypeId::Rentenbescheid, 1);
    upload(&mut snapshot, GENERAL_KEY, DocumentTypeId::Kaufvertrag, 1);
    upload(&mut snapshot, GENERAL_KEY, DocumentTypeId::Lageplan, 1);
    snapshot
        .application
        .documents
        .0
        .entry("main".to_string())
        .or_default()
        .insert("legacy_scan".to_string(), files(1, 0));

    let items = generator().generate(&input(snapshot));
    let extras: Vec<&str> = ids(&items)
        .into_iter()
        .filter(|id| id.starts_with("zusatzdokument_"))
        .collect();

    assert_eq!(
        extras,
        vec![
            "zusatzdokument_main_rentenbescheid",
            "zusatzdokument_general_kaufvertrag"
        ]
    );
    let pension = item(&items, "zusatzdokument_main_rentenbescheid");
    assert_eq!(pension.system_status, SystemStatus::Undefined);
    assert_eq!(pension.linked_docs, vec!["main_rentenbescheid_0"]);
}

#[test]
fn regenerated_items_keep_reviewer_decisions() {
    let snapshot = with_rent_income(new_build_snapshot());
    let first = generator().generate(&input(snapshot.clone()));

    let mut reviewed = first.clone();
    let tax = reviewed
        .iter_mut()
        .find(|item| item.id == "einkommenssteuerbescheid_main")
        .expect("tax item");
    tax.apply_review(&reviewer(AgentStatus::Wrong), chrono::Utc::now());

    let mut changed = snapshot;
    upload(&mut changed, "main", DocumentTypeId::Einkommenssteuerbescheid, 1);
    upload(&mut changed, "main", DocumentTypeId::Einkommenssteuererklaerung, 1);
    let fresh = generator().generate(&input(changed));

    let merged = merge(fresh.clone(), &reviewed, MergeMode::Retain);
    let tax = item(&merged, "einkommenssteuerbescheid_main");

    assert_eq!(ids(&merged), ids(&fresh));
    assert_eq!(tax.system_status, SystemStatus::Undefined);
    assert_eq!(tax.agent_status, AgentStatus::Wrong);
    assert_eq!(tax.agent_notes.as_deref(), Some("Nachweis gesichtet"));
    assert!(tax.status_set_by.is_some());
}

#[test]
fn orphaned_reviewer_items_survive_unless_purged() {
    let with_tax = generator().generate(&input(with_rent_income(new_build_snapshot())));
    let without_tax = generator().generate(&input(new_build_snapshot()));

    let retained = merge(without_tax.clone(), &with_tax, MergeMode::Retain);
    let purged = merge(without_tax.clone(), &with_tax, MergeMode::PurgeOrphans);

    assert_eq!(position(&retained, "einkommenssteuerbescheid_main"), without_tax.len());
    assert_eq!(ids(&purged), ids(&without_tax));
}

#[test]
fn merging_a_fresh_checklist_into_itself_is_a_no_op() {
    let mut snapshot = with_rent_income(mixed_household_snapshot());
    upload(&mut snapshot, "main", DocumentTypeId::Rentenbescheid, 1);
    let fresh = generator().generate(&input(snapshot));

    let first_generation = merge(fresh.clone(), &[], MergeMode::Retain);
    let round_trip = merge(fresh.clone(), &first_generation, MergeMode::Retain);

    assert_eq!(first_generation, fresh);
    assert_eq!(round_trip, fresh);
    assert!(round_trip.iter().all(|item| item.agent_status == AgentStatus::Undefined
        && item.agent_notes.is_none()
        && item.status_set_by.is_none()));
}

#[test]
fn uploads_of_excluded_members_produce_no_items() {
    let mut snapshot = mixed_household_snapshot();
    let excluded_key = "additional:p-excluded";
    upload(&mut snapshot, excluded_key, DocumentTypeId::LohnGehaltsbescheinigungen, 2);
    upload(&mut snapshot, excluded_key, DocumentTypeId::Rentenbescheid, 1);

    let items = generator().generate(&input(snapshot));

    assert!(!ids(&items).iter().any(|id| id.contains("p-excluded")));
    assert!(items.iter().all(|item| !item.title.contains("Er. L.")
        && !item.linked_docs.iter().any(|doc| doc.contains("p-excluded"))));
    let overview = item(&items, DOCUMENT_COMPLETENESS_ID);
    assert!(!overview.system_comment.contains("Er. L."));
    assert!(overview
        .system_errors
        .iter()
        .all(|error| !error.contains("Er. L.")));
}
