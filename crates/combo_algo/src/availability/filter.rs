//! Combination filtering against already-processed attributes.
//!
//! A combination matches a processed attribute iff some row for that
//! attribute has a value set that is a superset of the attribute's selected
//! values. An empty selected set is matched by any row. Rows are scanned in
//! full, so a malformed combination with duplicate rows matches through any
//! of them.

use combo_core::{AttributeId, Catalog, Combination, SelectedAttribute};

pub fn matches_processed(combination: &Combination, processed: &[&SelectedAttribute]) -> bool {
    processed.iter().all(|p| {
        combination
            .rows()
            .iter()
            .any(|row| row.attribute_id == p.attribute_id && p.values.is_subset(&row.value_ids))
    })
}

/// Combinations constraining `current` that match every processed attribute,
/// in catalog order.
pub fn surviving<'c>(
    catalog: &'c Catalog,
    current: AttributeId,
    processed: &[&SelectedAttribute],
) -> Vec<&'c Combination> {
    catalog
        .iter()
        .filter(|c| c.has_attribute(current) && matches_processed(c, processed))
        .collect()
}
