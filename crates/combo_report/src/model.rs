//! Report model: one entry per product attribute plus the pass echo.

use serde::Serialize;

use combo_algo::AvailabilityPass;
use combo_core::{
    CatalogId, ProductAttributes, Selection, SelectionOrder, ValueAvailability, ValueId,
};

/// Borrowed view of everything a report needs.
#[derive(Clone, Copy, Debug)]
pub struct ReportInputs<'a> {
    pub product: &'a ProductAttributes,
    pub selection: &'a Selection,
    pub order: SelectionOrder,
    pub pass: &'a AvailabilityPass,
    /// Held availability after the pass.
    pub availability: &'a ValueAvailability,
    pub catalog_id: Option<&'a CatalogId>,
    pub catalog_error: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    pub pass_kind: String,
    pub selection_order: String,
    pub catalog_id: Option<String>,
    pub catalog_error: Option<String>,
    pub selection: Vec<SelectionEcho>,
    pub attributes: Vec<AttributeReport>,
    /// Decided values that no product attribute renders.
    pub unlisted: Vec<ValueState>,
    pub trace: Vec<TraceEcho>,
    pub totals: Totals,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectionEcho {
    pub attribute_id: u32,
    pub values: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributeReport {
    pub attribute_id: u32,
    pub enabled: Vec<u32>,
    pub disabled: Vec<u32>,
    /// Never decided by any pass so far.
    pub untouched: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValueState {
    pub value_id: u32,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceEcho {
    pub attribute_id: u32,
    pub matched: usize,
    pub impossible: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub enabled: usize,
    pub disabled: usize,
    pub untouched: usize,
}

pub fn build_report(inputs: &ReportInputs<'_>) -> AvailabilityReport {
    let mut totals = Totals::default();
    let mut listed: Vec<ValueId> = Vec::new();

    let attributes = inputs
        .product
        .attributes()
        .iter()
        .map(|attr| {
            let mut out = AttributeReport {
                attribute_id: attr.id.get(),
                enabled: Vec::new(),
                disabled: Vec::new(),
                untouched: Vec::new(),
            };
            for &v in &attr.values {
                listed.push(v);
                match inputs.availability.get(v) {
                    Some(true) => out.enabled.push(v.get()),
                    Some(false) => out.disabled.push(v.get()),
                    None => out.untouched.push(v.get()),
                }
            }
            totals.enabled += out.enabled.len();
            totals.disabled += out.disabled.len();
            totals.untouched += out.untouched.len();
            out
        })
        .collect();

    let unlisted = inputs
        .availability
        .iter()
        .filter(|(v, _)| !listed.contains(v))
        .map(|(v, enabled)| ValueState { value_id: v.get(), enabled })
        .collect();

    let selection = inputs
        .selection
        .iter()
        .map(|s| SelectionEcho {
            attribute_id: s.attribute_id.get(),
            values: s.values.iter().map(|v| v.get()).collect(),
        })
        .collect();

    let trace = inputs
        .pass
        .trace
        .iter()
        .map(|t| TraceEcho { attribute_id: t.attribute_id.get(), matched: t.matched, impossible: t.impossible })
        .collect();

    AvailabilityReport {
        pass_kind: inputs.pass.kind.as_str().to_string(),
        selection_order: inputs.order.as_str().to_string(),
        catalog_id: inputs.catalog_id.map(|c| c.to_string()),
        catalog_error: inputs.catalog_error.map(str::to_owned),
        selection,
        attributes,
        unlisted,
        trace,
        totals,
    }
}
