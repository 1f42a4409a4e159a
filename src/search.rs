//! Free-text branch search over the loaded dataset.

use crate::models::Salon;

/// Salons whose "suburb address name" contains `query`, case-insensitively.
/// A blank query matches nothing.
pub fn search_salons<'a>(query: &str, salons: &'a [Salon]) -> Vec<&'a Salon> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    salons
        .iter()
        .filter(|s| {
            ["suburb", "address", "name"]
                .map(|key| s.text(key).unwrap_or_default())
                .join(" ")
                .to_lowercase()
                .contains(&query)
        })
        .collect()
}

/// Distinct suburb names, sorted.
pub fn unique_suburbs(salons: &[Salon]) -> Vec<String> {
    let mut suburbs: Vec<String> = salons
        .iter()
        .filter_map(|s| s.text("suburb"))
        .collect();
    suburbs.sort();
    suburbs.dedup();
    suburbs
}
