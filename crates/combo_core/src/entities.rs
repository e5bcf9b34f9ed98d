//! crates/combo_core/src/entities.rs
//! Domain records: catalog combinations, the ordered selection, the product
//! layout and the availability map. All I/O-free; the JSON wire shapes live in
//! `combo_io`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{AttributeId, ValueId};

/// Ordered set of value ids (deterministic iteration).
pub type ValueSet = BTreeSet<ValueId>;

// ----------------------------- Catalog -----------------------------

/// One attribute's contribution to a combination row.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeRow {
    pub attribute_id: AttributeId,
    pub value_ids: ValueSet,
}

impl AttributeRow {
    pub fn new(attribute_id: AttributeId, value_ids: impl IntoIterator<Item = ValueId>) -> Self {
        Self { attribute_id, value_ids: value_ids.into_iter().collect() }
    }
}

/// An admissible assignment across some or all attributes, tagged with stock.
///
/// Immutable once built. Rows are kept in catalog order; lookups by attribute id
/// go through a hash index. When a malformed combination repeats an attribute id,
/// the first row wins.
#[derive(Clone, Debug)]
pub struct Combination {
    rows: Vec<AttributeRow>,
    in_stock: bool,
    index: HashMap<AttributeId, usize>,
}

impl Combination {
    pub fn new(rows: Vec<AttributeRow>, in_stock: bool) -> Self {
        let mut index = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            index.entry(row.attribute_id).or_insert(i);
        }
        Self { rows, in_stock, index }
    }

    #[inline]
    pub fn in_stock(&self) -> bool { self.in_stock }

    #[inline]
    pub fn rows(&self) -> &[AttributeRow] { &self.rows }

    /// The row for `attribute`, if this combination constrains it.
    #[inline]
    pub fn row(&self, attribute: AttributeId) -> Option<&AttributeRow> {
        self.index.get(&attribute).map(|&i| &self.rows[i])
    }

    #[inline]
    pub fn has_attribute(&self, attribute: AttributeId) -> bool {
        self.index.contains_key(&attribute)
    }
}

impl PartialEq for Combination {
    fn eq(&self, other: &Self) -> bool {
        self.in_stock == other.in_stock && self.rows == other.rows
    }
}

impl Eq for Combination {}

/// The ordered combination catalog. Order carries no meaning but is kept stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    combinations: Vec<Combination>,
}

impl Catalog {
    pub fn new(combinations: Vec<Combination>) -> Self { Self { combinations } }

    pub fn empty() -> Self { Self::default() }

    #[inline] pub fn is_empty(&self) -> bool { self.combinations.is_empty() }
    #[inline] pub fn len(&self) -> usize { self.combinations.len() }
    #[inline] pub fn combinations(&self) -> &[Combination] { &self.combinations }

    pub fn iter(&self) -> impl Iterator<Item = &Combination> { self.combinations.iter() }
}

impl FromIterator<Combination> for Catalog {
    fn from_iter<I: IntoIterator<Item = Combination>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ----------------------------- Selection -----------------------------

/// The currently chosen value(s) of one attribute. `values` may be empty.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectedAttribute {
    pub attribute_id: AttributeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub values: ValueSet,
}

impl SelectedAttribute {
    pub fn new(attribute_id: AttributeId, values: impl IntoIterator<Item = ValueId>) -> Self {
        Self { attribute_id, values: values.into_iter().collect() }
    }

    /// Touched attribute with nothing chosen.
    pub fn untouched(attribute_id: AttributeId) -> Self {
        Self { attribute_id, values: ValueSet::new() }
    }
}

/// Ordered selection: earlier entries constrain later ones.
///
/// Each attribute appears at most once; pushing an attribute that is already
/// present replaces its values in place and keeps its position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Selection(Vec<SelectedAttribute>);

impl Selection {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, selected: SelectedAttribute) {
        match self.0.iter_mut().find(|s| s.attribute_id == selected.attribute_id) {
            Some(slot) => slot.values = selected.values,
            None => self.0.push(selected),
        }
    }

    /// Builder form of [`Selection::push`].
    pub fn with(mut self, attribute: AttributeId, values: impl IntoIterator<Item = ValueId>) -> Self {
        self.push(SelectedAttribute::new(attribute, values));
        self
    }

    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }
    #[inline] pub fn len(&self) -> usize { self.0.len() }
    #[inline] pub fn as_slice(&self) -> &[SelectedAttribute] { &self.0 }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedAttribute> { self.0.iter() }

    pub fn get(&self, attribute: AttributeId) -> Option<&SelectedAttribute> {
        self.0.iter().find(|s| s.attribute_id == attribute)
    }
}

impl FromIterator<SelectedAttribute> for Selection {
    fn from_iter<I: IntoIterator<Item = SelectedAttribute>>(iter: I) -> Self {
        let mut out = Selection::new();
        for s in iter {
            out.push(s);
        }
        out
    }
}

// ----------------------------- Product layout -----------------------------

/// One rendered attribute and its values, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductAttribute {
    pub id: AttributeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub values: Vec<ValueId>,
}

/// The product's attributes in declaration order.
///
/// Construction enforces that attribute ids are distinct and that a value id
/// belongs to at most one attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProductAttributes {
    attributes: Vec<ProductAttribute>,
}

impl ProductAttributes {
    pub fn new(attributes: Vec<ProductAttribute>) -> Result<Self, CoreError> {
        let mut seen_attrs = BTreeSet::new();
        let mut owner: BTreeMap<ValueId, AttributeId> = BTreeMap::new();
        for a in &attributes {
            if !seen_attrs.insert(a.id) {
                return Err(CoreError::DuplicateAttribute(a.id));
            }
            for &v in &a.values {
                if let Some(&prev) = owner.get(&v) {
                    if prev != a.id {
                        return Err(CoreError::SharedValue { value: v, first: prev, second: a.id });
                    }
                }
                owner.insert(v, a.id);
            }
        }
        Ok(Self { attributes })
    }

    #[inline] pub fn attributes(&self) -> &[ProductAttribute] { &self.attributes }

    pub fn attribute(&self, id: AttributeId) -> Option<&ProductAttribute> {
        self.attributes.iter().find(|a| a.id == id)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ProductAttributes {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw { attributes: Vec<ProductAttribute> }
        let raw = Raw::deserialize(d)?;
        ProductAttributes::new(raw.attributes).map_err(serde::de::Error::custom)
    }
}

// ----------------------------- Availability -----------------------------

/// ValueId → enabled flag. Ordered by value id for stable emission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValueAvailability(BTreeMap<ValueId, bool>);

impl ValueAvailability {
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub fn set(&mut self, value: ValueId, enabled: bool) {
        self.0.insert(value, enabled);
    }

    /// `None` when the value has never been decided.
    #[inline]
    pub fn get(&self, value: ValueId) -> Option<bool> {
        self.0.get(&value).copied()
    }

    #[inline]
    pub fn is_enabled(&self, value: ValueId) -> bool {
        self.get(value).unwrap_or(false)
    }

    #[inline] pub fn len(&self) -> usize { self.0.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (ValueId, bool)> + '_ {
        self.0.iter().map(|(&v, &e)| (v, e))
    }

    pub fn enabled(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.iter().filter(|(_, e)| *e).map(|(v, _)| v)
    }

    pub fn disabled(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.iter().filter(|(_, e)| !*e).map(|(v, _)| v)
    }

    /// Overwrite entries with those decided in `pass`; other entries keep their state.
    pub fn overlay(&mut self, pass: &ValueAvailability) {
        for (v, e) in pass.iter() {
            self.0.insert(v, e);
        }
    }
}

impl FromIterator<(ValueId, bool)> for ValueAvailability {
    fn from_iter<I: IntoIterator<Item = (ValueId, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(n: u32) -> AttributeId { AttributeId::new(n) }
    fn v(n: u32) -> ValueId { ValueId::new(n) }

    #[test]
    fn combination_row_lookup_first_row_wins() {
        let c = Combination::new(
            vec![
                AttributeRow::new(a(1), [v(10)]),
                AttributeRow::new(a(2), [v(20)]),
                AttributeRow::new(a(1), [v(11)]),
            ],
            true,
        );
        assert!(c.has_attribute(a(2)));
        assert!(!c.has_attribute(a(3)));
        let row = c.row(a(1)).unwrap();
        assert!(row.value_ids.contains(&v(10)));
        assert!(!row.value_ids.contains(&v(11)));
    }

    #[test]
    fn selection_keeps_first_position_on_repush() {
        let sel = Selection::new()
            .with(a(2), [v(20)])
            .with(a(1), [v(10)])
            .with(a(2), [v(21)]);
        let order: Vec<_> = sel.iter().map(|s| s.attribute_id).collect();
        assert_eq!(order, vec![a(2), a(1)]);
        assert!(sel.get(a(2)).unwrap().values.contains(&v(21)));
        assert_eq!(sel.len(), 2);
    }

    #[test]
    fn product_rejects_shared_values_and_duplicate_attributes() {
        let dup = ProductAttributes::new(vec![
            ProductAttribute { id: a(1), values: vec![v(10)] },
            ProductAttribute { id: a(1), values: vec![v(11)] },
        ]);
        assert_eq!(dup, Err(CoreError::DuplicateAttribute(a(1))));

        let shared = ProductAttributes::new(vec![
            ProductAttribute { id: a(1), values: vec![v(10)] },
            ProductAttribute { id: a(2), values: vec![v(10)] },
        ]);
        assert_eq!(
            shared,
            Err(CoreError::SharedValue { value: v(10), first: a(1), second: a(2) })
        );
    }

    #[test]
    fn availability_overlay_only_touches_decided_values() {
        let mut held: ValueAvailability = [(v(10), true), (v(20), true)].into_iter().collect();
        let pass: ValueAvailability = [(v(20), false), (v(21), true)].into_iter().collect();
        held.overlay(&pass);
        assert_eq!(held.get(v(10)), Some(true));
        assert_eq!(held.get(v(20)), Some(false));
        assert_eq!(held.get(v(21)), Some(true));
        assert_eq!(held.enabled().collect::<Vec<_>>(), vec![v(10), v(21)]);
        assert_eq!(held.disabled().collect::<Vec<_>>(), vec![v(20)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn product_layout_deserializes_with_validation() {
        let ok: ProductAttributes =
            serde_json::from_str(r#"{"attributes":[{"id":1,"values":[10,11]},{"id":2}]}"#).unwrap();
        assert_eq!(ok.attributes().len(), 2);
        assert!(ok.attribute(a(2)).unwrap().values.is_empty());
        assert_eq!(ok.attribute(a(1)).unwrap().values, vec![v(10), v(11)]);

        let bad = serde_json::from_str::<ProductAttributes>(
            r#"{"attributes":[{"id":1,"values":[10]},{"id":2,"values":[10]}]}"#,
        );
        assert!(bad.is_err());
    }
}
