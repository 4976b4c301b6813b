//! Displayed subset of the catalog snapshot

use shared::models::Medicine;
use std::cmp::Ordering;

fn matches_search(medicine: &Medicine, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [&medicine.english_medicine_name, &medicine.arabic_medicine_name]
        .into_iter()
        .flatten()
        .any(|name| name.to_lowercase().contains(needle))
}

/// Case-insensitive order, lowercase before uppercase on ties
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Records matching `search` (either name, case-insensitive substring) and
/// `drug` (exact flag), sorted by English name
///
/// An empty search or `None` drug matches everything. The sort is stable.
pub fn apply_filters(all: &[Medicine], search: &str, drug: Option<i32>) -> Vec<Medicine> {
    let needle = search.to_lowercase();
    let mut out: Vec<Medicine> = all
        .iter()
        .filter(|m| matches_search(m, &needle))
        .filter(|m| drug.is_none_or(|d| m.drug == d))
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        compare_names(
            a.english_medicine_name.as_deref().unwrap_or_default(),
            b.english_medicine_name.as_deref().unwrap_or_default(),
        )
    });
    out
}
