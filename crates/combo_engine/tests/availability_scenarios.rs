//! Engine scenarios driven through the collaborator contracts: form state in,
//! toggles out, catalog from the wire shape.

use combo_core::{
    AttributeId, Catalog, EngineConfig, FormSelection, ProductAttribute, ProductAttributes,
    SelectionOrder, ValueAvailability, ValueId,
};
use combo_engine::{AvailabilityEngine, PassKind};
use combo_io::loader::decode_catalog;
use serde_json::json;

fn a(n: u32) -> AttributeId { AttributeId::new(n) }
fn v(n: u32) -> ValueId { ValueId::new(n) }

fn product() -> ProductAttributes {
    ProductAttributes::new(vec![
        ProductAttribute { id: a(1), values: vec![v(10), v(11)] },
        ProductAttribute { id: a(2), values: vec![v(20), v(21)] },
    ])
    .unwrap()
}

fn wire_catalog() -> Catalog {
    let wire = json!([
        {"Attributes": [{"Id": 1, "ValueIds": [10]}, {"Id": 2, "ValueIds": [20]}], "InStock": true},
        {"Attributes": [{"Id": 1, "ValueIds": [10]}, {"Id": 2, "ValueIds": [21]}], "InStock": false}
    ]);
    decode_catalog(&wire).unwrap().0
}

fn loaded_engine(p: &ProductAttributes, cfg: EngineConfig) -> AvailabilityEngine {
    let mut e = AvailabilityEngine::for_layout(p, cfg);
    let mut ignore = |_: ValueId, _: bool| {};
    e.on_catalog_loaded(Ok::<_, String>(wire_catalog()), p, &FormSelection::new(), &mut ignore)
        .unwrap();
    e
}

#[test]
fn selecting_present_value_enables_in_stock_partner() {
    let p = product();
    let mut e = loaded_engine(&p, EngineConfig::default());
    let mut form = FormSelection::new();
    form.choose(a(1), v(10));

    let mut toggles = Vec::new();
    let pass = e.refresh(&p, &form, &mut |val: ValueId, on: bool| toggles.push((val.get(), on)));
    assert_eq!(pass.kind, PassKind::Narrowed);

    assert_eq!(toggles, vec![(10, true), (11, false), (20, true), (21, false)]);
    assert!(e.availability().is_enabled(v(20)));
    assert!(!e.availability().is_enabled(v(21)));
}

#[test]
fn selecting_absent_value_disables_whole_partner_attribute() {
    let p = product();
    let mut e = loaded_engine(&p, EngineConfig::default());
    let mut form = FormSelection::new();
    form.choose(a(1), v(11));

    let mut sink = ValueAvailability::new();
    let pass = e.refresh(&p, &form, &mut sink);
    assert!(pass.trace.iter().any(|t| t.attribute_id == a(2) && t.impossible));
    assert_eq!(sink.get(v(20)), Some(false));
    assert_eq!(sink.get(v(21)), Some(false));
}

#[test]
fn load_with_selection_recomputes_immediately() {
    let p = product();
    let mut form = FormSelection::new();
    form.choose(a(1), v(10));
    let mut e = AvailabilityEngine::for_layout(&p, EngineConfig::default());
    let mut sink = ValueAvailability::new();

    let pass = e
        .on_catalog_loaded(Ok::<_, String>(wire_catalog()), &p, &form, &mut sink)
        .unwrap()
        .cloned();
    assert_eq!(pass.map(|p| p.kind), Some(PassKind::Narrowed));
    assert_eq!(sink.get(v(20)), Some(true));
}

#[test]
fn product_without_attributes_is_not_recomputed_on_load() {
    let p = ProductAttributes::new(Vec::new()).unwrap();
    let mut e = AvailabilityEngine::for_layout(&p, EngineConfig::default());
    let mut calls = 0;
    let out = e
        .on_catalog_loaded(Ok::<_, String>(wire_catalog()), &p, &FormSelection::new(), &mut |_: ValueId, _: bool| calls += 1)
        .unwrap()
        .is_none();
    assert!(out);
    assert_eq!(calls, 0);
}

#[test]
fn touched_order_lets_second_attribute_constrain_first() {
    let p = product();
    let cfg = EngineConfig { selection_order: SelectionOrder::Touched };
    let mut e = loaded_engine(&p, cfg);
    let mut form = FormSelection::new();
    form.choose(a(2), v(21));

    let mut sink = ValueAvailability::new();
    e.refresh(&p, &form, &mut sink);
    // Attribute 2 is processed first and sees every combination.
    assert_eq!(sink.get(v(20)), Some(true));
    assert_eq!(sink.get(v(21)), Some(false));
    // Attribute 1 only sees the combination carrying 21 (out of stock).
    assert_eq!(sink.get(v(10)), Some(false));
    assert_eq!(sink.get(v(11)), Some(false));
}

#[test]
fn last_call_wins() {
    let p = product();
    let mut e = loaded_engine(&p, EngineConfig::default());
    let mut form = FormSelection::new();

    form.choose(a(1), v(11));
    e.refresh(&p, &form, &mut ValueAvailability::new());
    assert!(!e.availability().is_enabled(v(20)));

    form.choose(a(1), v(10));
    e.refresh(&p, &form, &mut ValueAvailability::new());
    assert!(e.availability().is_enabled(v(20)));
}
