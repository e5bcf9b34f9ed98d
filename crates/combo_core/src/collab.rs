//! Collaborator contracts around the engine: value enumeration, selection
//! reads, toggle output and catalog transport. Reference in-memory
//! implementations live here too.

use std::collections::BTreeMap;
use std::fmt;

use crate::entities::{Catalog, ProductAttributes, ValueAvailability, ValueSet};
use crate::ids::{AttributeId, ValueId};

/// Enumerates the attributes and values currently rendered for the product.
pub trait ProductLayout {
    /// Attribute ids in declaration order.
    fn attribute_ids(&self) -> Vec<AttributeId>;

    /// Value ids of one attribute in display order; empty for unknown attributes.
    fn value_ids(&self, attribute: AttributeId) -> Vec<ValueId>;

    /// Every value id across the product.
    fn all_value_ids(&self) -> Vec<ValueId> {
        self.attribute_ids()
            .into_iter()
            .flat_map(|a| self.value_ids(a))
            .collect()
    }
}

/// Read-only view of what the user currently has checked.
pub trait SelectionState {
    fn selected_values(&self, attribute: AttributeId) -> ValueSet;

    /// Attributes in the order they were first given a value. Attributes with
    /// nothing chosen are omitted.
    fn touch_order(&self) -> Vec<AttributeId> {
        Vec::new()
    }
}

/// Receives one `(value, enabled)` per value per pass. Applying the same flag
/// twice must be a no-op.
pub trait ToggleSink {
    fn toggle(&mut self, value: ValueId, enabled: bool);
}

impl<F: FnMut(ValueId, bool)> ToggleSink for F {
    fn toggle(&mut self, value: ValueId, enabled: bool) {
        self(value, enabled)
    }
}

impl ToggleSink for ValueAvailability {
    fn toggle(&mut self, value: ValueId, enabled: bool) {
        self.set(value, enabled);
    }
}

/// Single-shot catalog source.
pub trait CatalogTransport {
    type Error: fmt::Display;

    fn fetch(&mut self) -> Result<Catalog, Self::Error>;
}

// ----------------------------- Reference implementations -----------------------------

impl ProductLayout for ProductAttributes {
    fn attribute_ids(&self) -> Vec<AttributeId> {
        self.attributes().iter().map(|a| a.id).collect()
    }

    fn value_ids(&self, attribute: AttributeId) -> Vec<ValueId> {
        self.attribute(attribute).map(|a| a.values.clone()).unwrap_or_default()
    }
}

/// In-memory form state: chosen values per attribute plus touch order.
///
/// An attribute enters the touch order when it first gains a value and leaves
/// it when its last value is removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormSelection {
    chosen: BTreeMap<AttributeId, ValueSet>,
    order: Vec<AttributeId>,
}

impl FormSelection {
    pub fn new() -> Self { Self::default() }

    /// Checkbox-style: add `value` to the attribute's chosen set.
    pub fn select(&mut self, attribute: AttributeId, value: ValueId) {
        self.chosen.entry(attribute).or_default().insert(value);
        self.touch(attribute);
    }

    /// Radio/dropdown-style: make `value` the only choice for the attribute.
    pub fn choose(&mut self, attribute: AttributeId, value: ValueId) {
        self.set(attribute, [value]);
    }

    pub fn deselect(&mut self, attribute: AttributeId, value: ValueId) {
        if let Some(set) = self.chosen.get_mut(&attribute) {
            set.remove(&value);
        }
        self.settle(attribute);
    }

    pub fn set(&mut self, attribute: AttributeId, values: impl IntoIterator<Item = ValueId>) {
        let values: ValueSet = values.into_iter().collect();
        self.chosen.insert(attribute, values);
        self.settle(attribute);
    }

    pub fn clear(&mut self, attribute: AttributeId) {
        self.chosen.remove(&attribute);
        self.settle(attribute);
    }

    fn touch(&mut self, attribute: AttributeId) {
        if !self.order.contains(&attribute) {
            self.order.push(attribute);
        }
    }

    fn settle(&mut self, attribute: AttributeId) {
        let empty = self.chosen.get(&attribute).map_or(true, |s| s.is_empty());
        if empty {
            self.chosen.remove(&attribute);
            self.order.retain(|a| *a != attribute);
        } else {
            self.touch(attribute);
        }
    }
}

impl SelectionState for FormSelection {
    fn selected_values(&self, attribute: AttributeId) -> ValueSet {
        self.chosen.get(&attribute).cloned().unwrap_or_default()
    }

    fn touch_order(&self) -> Vec<AttributeId> {
        self.order.clone()
    }
}
