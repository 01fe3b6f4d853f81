use std::cmp::Ordering;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use super::Entry;

/// Directories first, then everything else; names in locale order within each group.
pub fn compare_entries(left: &Entry, right: &Entry) -> Ordering {
    right
        .is_directory()
        .cmp(&left.is_directory())
        .then_with(|| locale_cmp(&left.name(), &right.name()))
}

pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare_entries);
}

/// Multi-level comparison in the spirit of a root-locale collation:
/// base letters ignoring case and accents, then accents, then case with lowercase
/// first, then code points as a last tie-break.
pub fn locale_cmp(left: &str, right: &str) -> Ordering {
    base_letters(left)
        .cmp(&base_letters(right))
        .then_with(|| accented_letters(left).cmp(&accented_letters(right)))
        .then_with(|| case_pattern(left).cmp(&case_pattern(right)))
        .then_with(|| left.cmp(right))
}

fn base_letters(text: &str) -> Vec<char> {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn accented_letters(text: &str) -> Vec<char> {
    text.nfd().flat_map(char::to_lowercase).collect()
}

fn case_pattern(text: &str) -> Vec<bool> {
    text.nfd().map(char::is_uppercase).collect()
}
