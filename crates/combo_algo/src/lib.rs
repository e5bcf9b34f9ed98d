// crates/combo_algo/src/lib.rs
#![forbid(unsafe_code)]

pub use combo_core::{
    AttributeId, Catalog, Combination, ProductLayout, SelectedAttribute, Selection,
    ValueAvailability, ValueId,
};

// ----------------------------- Pass output -----------------------------

/// Which branch a recomputation took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    /// No catalog delivered yet; nothing decided.
    CatalogPending,
    /// Catalog known and empty; every known value disabled.
    EmptyCatalog,
    /// Nothing selected; nothing decided.
    NoSelection,
    /// Selected attributes processed in order.
    Narrowed,
}

impl PassKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PassKind::CatalogPending => "catalog_pending",
            PassKind::EmptyCatalog => "empty_catalog",
            PassKind::NoSelection => "no_selection",
            PassKind::Narrowed => "narrowed",
        }
    }

    /// True iff this pass leaves previously held availability untouched.
    pub fn is_noop(self) -> bool {
        matches!(self, PassKind::CatalogPending | PassKind::NoSelection)
    }
}

/// What happened to one selected attribute during a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeTrace {
    pub attribute_id: AttributeId,
    /// Combinations that survived filtering for this attribute.
    pub matched: usize,
    /// No combination survived: every value of the attribute was disabled.
    pub impossible: bool,
}

/// Result of one recomputation: the values it decided plus a per-attribute trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityPass {
    pub kind: PassKind,
    pub values: ValueAvailability,
    pub trace: Vec<AttributeTrace>,
}

impl AvailabilityPass {
    pub fn noop(kind: PassKind) -> Self {
        Self { kind, values: ValueAvailability::new(), trace: Vec::new() }
    }

    pub fn pending() -> Self {
        Self::noop(PassKind::CatalogPending)
    }
}

// ----------------------------- Availability (public surface) -----------------------------

pub mod availability {
    pub mod filter;
    pub mod merge;
    pub mod pass;

    pub use filter::{matches_processed, surviving};
    pub use merge::merge_stock;
    pub use pass::compute_availability;
}

pub use availability::compute_availability;
