use crate::catalog::Profile;

/// Case-insensitive substring filter that keeps the catalog's order.
pub fn filter_profiles(all: &[Profile], query: &str) -> Vec<Profile> {
    if query.is_empty() {
        return all.to_vec();
    }
    let needle = query.to_lowercase();
    all.iter()
        .filter(|profile| profile.name().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Keeps `previous` when it still points into `filtered`, falls back to the
/// first row otherwise, and yields `None` for an empty list.
pub fn reconcile_selection(filtered: &[Profile], previous: Option<usize>) -> Option<usize> {
    if filtered.is_empty() {
        return None;
    }
    match previous {
        Some(index) if index < filtered.len() => Some(index),
        _ => Some(0),
    }
}
