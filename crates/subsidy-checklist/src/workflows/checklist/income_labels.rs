//! Recognition of sick-pay entries in the free-text "other income" labels.
//!
//! This is the only place free-text user input drives a rule decision, so the
//! matcher is deliberately tolerant: labels are folded to lowercase ASCII letters
//! before comparison and single-character typos of the canonical term are accepted.

const CANONICAL: &str = "krankengeld";

/// Known spellings, compared as substrings of the folded label.
const VARIANTS: &[&str] = &[
    "krankengeld",
    "krankentagegeld",
    "kinderkrankengeld",
    "krankegeld",
    "krankengld",
    "krankngeld",
    "krankengelt",
    "krangengeld",
    "kankengeld",
    "krakengeld",
    "kranknegeld",
    "krankenggeld",
    "krankheitsgeld",
];

/// Abbreviations only accepted when they make up the whole label.
const ABBREVIATIONS: &[&str] = &["kg", "krg"];

/// Folds a label to lowercase ASCII letters: umlauts are transliterated, everything
/// else (whitespace, punctuation, digits) is dropped.
pub(crate) fn fold_label(label: &str) -> String {
    let mut folded = String::with_capacity(label.len());
    for c in label.chars().flat_map(char::to_lowercase) {
        match c {
            'ä' => folded.push_str("ae"),
            'ö' => folded.push_str("oe"),
            'ü' => folded.push_str("ue"),
            'ß' => folded.push_str("ss"),
            c if c.is_ascii_alphabetic() => folded.push(c),
            _ => {}
        }
    }
    folded
}

pub fn is_sick_pay_label(label: &str) -> bool {
    let folded = fold_label(label);
    if folded.is_empty() {
        return false;
    }

    if ABBREVIATIONS.contains(&folded.as_str()) {
        return true;
    }

    if VARIANTS.iter().any(|variant| folded.contains(variant)) {
        return true;
    }

    contains_near_match(&folded, CANONICAL)
}

// Any window of the label within edit distance one of the canonical term.
fn contains_near_match(haystack: &str, needle: &str) -> bool {
    let hay: Vec<char> = haystack.chars().collect();
    let target: Vec<char> = needle.chars().collect();
    let lengths = [target.len() - 1, target.len(), target.len() + 1];

    lengths.iter().any(|&len| {
        len <= hay.len()
            && hay
                .windows(len)
                .any(|window| within_one_edit(window, &target))
    })
}

fn within_one_edit(left: &[char], right: &[char]) -> bool {
    let (shorter, longer) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    if longer.len() - shorter.len() > 1 {
        return false;
    }

    let mut i = 0;
    let mut j = 0;
    let mut edits = 0;
    while i < shorter.len() && j < longer.len() {
        if shorter[i] == longer[j] {
            i += 1;
            j += 1;
            continue;
        }
        edits += 1;
        if edits > 1 {
            return false;
        }
        if shorter.len() == longer.len() {
            i += 1;
        }
        j += 1;
    }
    edits + (longer.len() - j) + (shorter.len() - i) <= 1
}
