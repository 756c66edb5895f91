use super::super::domain::{ChecklistItem, FormProgress, FormSection, SystemStatus};

pub fn completeness_item_id(form: FormSection) -> String {
    format!("formular_{}", form.as_str())
}

/// One item per reported form, in canonical form order. Later reports for the same
/// form replace earlier ones.
pub fn completeness_items(progress: &[FormProgress]) -> Vec<ChecklistItem> {
    FormSection::ordered()
        .into_iter()
        .filter_map(|form| {
            progress
                .iter()
                .rev()
                .find(|entry| entry.form == form)
                .map(|entry| completeness_item(form, entry.percent))
        })
        .collect()
}

fn completeness_item(form: FormSection, percent: u8) -> ChecklistItem {
    let (status, errors) = if percent >= 100 {
        (SystemStatus::Correct, Vec::new())
    } else {
        (
            SystemStatus::Wrong,
            vec![format!("Formular ist erst zu {percent} % ausgefüllt")],
        )
    };

    ChecklistItem::new(
        completeness_item_id(form),
        format!("Vollständigkeit {}", form.label()),
        status,
    )
    .with_comment(format!("Das Formular {} ist zu {percent} % ausgefüllt.", form.label()))
    .with_errors(errors)
    .with_forms(&[form])
}
