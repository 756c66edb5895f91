//! Reviewer-facing narrative text.

use super::super::domain::{Address, FormNumber, FormSection};

pub const NOT_PROVIDED: &str = "nicht angegeben";

pub fn amount(value: FormNumber) -> String {
    value
        .value()
        .map(|amount| format!("{amount:.2} €"))
        .unwrap_or_else(|| NOT_PROVIDED.to_string())
}

pub fn year(value: FormNumber) -> String {
    whole(value)
}

pub fn count(value: FormNumber) -> String {
    whole(value)
}

fn whole(value: FormNumber) -> String {
    value
        .value()
        .map(|number| format!("{number:.0}"))
        .unwrap_or_else(|| NOT_PROVIDED.to_string())
}

pub fn flag(value: bool) -> String {
    if value { "ja" } else { "nein" }.to_string()
}

pub fn text(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NOT_PROVIDED.to_string())
}

pub fn address(value: Option<&Address>) -> String {
    let Some(address) = value.filter(|address| !address.is_empty()) else {
        return NOT_PROVIDED.to_string();
    };

    let street = [address.street.as_deref(), address.house_number.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let city = [address.postal_code.as_deref(), address.city.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    [street, city]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Line-oriented narrative: an intro sentence, one line per field and a closing
/// cross-check instruction.
#[derive(Debug, Default)]
pub struct Narrative {
    lines: Vec<String>,
}

impl Narrative {
    pub fn new(intro: impl Into<String>) -> Self {
        Self {
            lines: vec![intro.into()],
        }
    }

    pub fn field(mut self, label: &str, value: impl Into<String>) -> Self {
        self.lines.push(format!("- {label}: {}", value.into()));
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn cross_check(mut self, forms: &[FormSection]) -> String {
        if !forms.is_empty() {
            let names: Vec<&str> = forms.iter().map(|form| form.label()).collect();
            self.lines.push(format!(
                "Bitte gleichen Sie den Nachweis mit den Angaben in folgenden Formularen ab: {}.",
                names.join(", ")
            ));
        }
        self.finish()
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}
