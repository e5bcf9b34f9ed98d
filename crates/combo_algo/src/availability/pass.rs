//! One availability pass over an ordered selection.
//!
//! Branches, checked in this order:
//! 1. empty catalog: every value the layout knows is disabled;
//! 2. empty selection: nothing is decided;
//! 3. otherwise each selected attribute is processed in selection order. Its
//!    values are decided from the combinations that have a row for it and match
//!    every attribute processed before it. Values never seen among survivors are
//!    disabled; with no survivors the whole attribute is disabled.
//!
//! Attributes absent from the selection are left out of the result.

use combo_core::{Catalog, ProductLayout, SelectedAttribute, Selection, ValueAvailability};
use tracing::debug;

use crate::availability::filter::surviving;
use crate::availability::merge::merge_stock;
use crate::{AttributeTrace, AvailabilityPass, PassKind};

pub fn compute_availability(
    catalog: &Catalog,
    selected: &Selection,
    layout: &dyn ProductLayout,
) -> AvailabilityPass {
    if catalog.is_empty() {
        let values: ValueAvailability =
            layout.all_value_ids().into_iter().map(|v| (v, false)).collect();
        debug!(disabled = values.len(), "empty catalog: all values disabled");
        return AvailabilityPass { kind: PassKind::EmptyCatalog, values, trace: Vec::new() };
    }
    if selected.is_empty() {
        return AvailabilityPass::noop(PassKind::NoSelection);
    }

    let mut values = ValueAvailability::new();
    let mut trace = Vec::with_capacity(selected.len());
    let mut processed: Vec<&SelectedAttribute> = Vec::with_capacity(selected.len());

    for current in selected.iter() {
        let attr = current.attribute_id;
        let survivors = surviving(catalog, attr, &processed);

        if survivors.is_empty() {
            for v in layout.value_ids(attr) {
                values.set(v, false);
            }
            debug!(attribute = %attr, "no surviving combination: attribute disabled");
        } else {
            let stock = merge_stock(&survivors, attr);
            for v in layout.value_ids(attr) {
                if !stock.contains_key(&v) {
                    values.set(v, false);
                }
            }
            for (v, enabled) in stock {
                values.set(v, enabled);
            }
            debug!(attribute = %attr, matched = survivors.len(), "attribute narrowed");
        }

        trace.push(AttributeTrace {
            attribute_id: attr,
            matched: survivors.len(),
            impossible: survivors.is_empty(),
        });
        processed.push(current);
    }

    AvailabilityPass { kind: PassKind::Narrowed, values, trace }
}
