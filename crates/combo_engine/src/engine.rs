//! The availability engine.
//!
//! Lifecycle: `init` fixes the attribute ids; the catalog arrives once through
//! `on_catalog_loaded` (or `load_catalog` with a transport); every selection
//! change goes through `refresh`, or `recompute` when the caller already holds
//! the ordered selection.

use std::fmt;

use combo_algo::compute_availability;
use combo_core::{
    AttributeId, Catalog, CatalogTransport, EngineConfig, ProductLayout, SelectedAttribute,
    Selection, SelectionOrder, SelectionState, ToggleSink, ValueAvailability,
};
use tracing::{debug, warn};

use crate::emit::emit_pass;
use crate::{AvailabilityPass, EngineError};

/// Catalog lifecycle. A failed fetch lands in `Loaded` with an empty catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogState {
    #[default]
    Pending,
    Loaded(Catalog),
}

impl CatalogState {
    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            CatalogState::Pending => None,
            CatalogState::Loaded(c) => Some(c),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, CatalogState::Loaded(_))
    }
}

#[derive(Clone, Debug)]
pub struct AvailabilityEngine {
    attribute_ids: Vec<AttributeId>,
    config: EngineConfig,
    catalog: CatalogState,
    availability: ValueAvailability,
    last_pass: Option<AvailabilityPass>,
}

impl AvailabilityEngine {
    /// Fix the product's attribute ids (duplicates collapse, first position kept).
    /// Nothing is computed until a catalog arrives.
    pub fn init(attribute_ids: impl IntoIterator<Item = AttributeId>, config: EngineConfig) -> Self {
        let mut ids: Vec<AttributeId> = Vec::new();
        for id in attribute_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self {
            attribute_ids: ids,
            config,
            catalog: CatalogState::Pending,
            availability: ValueAvailability::new(),
            last_pass: None,
        }
    }

    pub fn for_layout(layout: &dyn ProductLayout, config: EngineConfig) -> Self {
        Self::init(layout.attribute_ids(), config)
    }

    #[inline] pub fn attribute_ids(&self) -> &[AttributeId] { &self.attribute_ids }
    #[inline] pub fn config(&self) -> EngineConfig { self.config }
    #[inline] pub fn catalog_state(&self) -> &CatalogState { &self.catalog }
    #[inline] pub fn catalog(&self) -> Option<&Catalog> { self.catalog.catalog() }

    /// Accumulated availability across passes.
    #[inline] pub fn availability(&self) -> &ValueAvailability { &self.availability }

    #[inline] pub fn last_pass(&self) -> Option<&AvailabilityPass> { self.last_pass.as_ref() }

    /// Deliver the single fetch outcome.
    ///
    /// On success, when the current selection is non-empty a pass runs
    /// immediately and is emitted to `sink`; the pass is returned. A failure is
    /// stored as an empty catalog and nothing is recomputed: the values stay as
    /// they are until the next selection-driven pass. A second delivery is
    /// rejected and leaves the stored catalog untouched.
    pub fn on_catalog_loaded<E: fmt::Display>(
        &mut self,
        outcome: Result<Catalog, E>,
        layout: &dyn ProductLayout,
        state: &dyn SelectionState,
        sink: &mut dyn ToggleSink,
    ) -> Result<Option<&AvailabilityPass>, EngineError> {
        if self.catalog.is_loaded() {
            warn!("catalog delivered twice; keeping the first");
            return Err(EngineError::CatalogAlreadyLoaded);
        }

        let catalog = match outcome {
            Ok(c) => {
                debug!(combinations = c.len(), "catalog loaded");
                c
            }
            Err(e) => {
                warn!(error = %e, "catalog fetch failed; treating catalog as empty");
                self.catalog = CatalogState::Loaded(Catalog::empty());
                return Ok(None);
            }
        };
        self.catalog = CatalogState::Loaded(catalog);

        let selected = self.current_selection(state);
        if selected.is_empty() {
            return Ok(None);
        }
        let pass = self.recompute(&selected, layout);
        emit_pass(pass, sink);
        Ok(self.last_pass.as_ref())
    }

    /// Fetch once from `transport` and deliver the outcome.
    pub fn load_catalog<T: CatalogTransport>(
        &mut self,
        transport: &mut T,
        layout: &dyn ProductLayout,
        state: &dyn SelectionState,
        sink: &mut dyn ToggleSink,
    ) -> Result<Option<&AvailabilityPass>, EngineError> {
        if self.catalog.is_loaded() {
            warn!("catalog delivered twice; keeping the first");
            return Err(EngineError::CatalogAlreadyLoaded);
        }
        let outcome = transport.fetch();
        self.on_catalog_loaded(outcome, layout, state, sink)
    }

    /// Run one pass over `selected` and overlay its decisions on the held map.
    ///
    /// While the catalog is pending nothing is decided.
    pub fn recompute(&mut self, selected: &Selection, layout: &dyn ProductLayout) -> &AvailabilityPass {
        let pass = match &self.catalog {
            CatalogState::Pending => {
                debug!("recompute before catalog delivery: no-op");
                AvailabilityPass::pending()
            }
            CatalogState::Loaded(catalog) => compute_availability(catalog, selected, layout),
        };
        self.availability.overlay(&pass.values);
        self.last_pass.insert(pass)
    }

    /// Read the ordered selection from `state` for the fixed attribute ids.
    ///
    /// Every fixed attribute yields one entry, possibly with no values. With
    /// `SelectionOrder::Touched` the touched attributes lead, in touch order.
    pub fn current_selection(&self, state: &dyn SelectionState) -> Selection {
        let mut out = Selection::new();
        if self.config.selection_order == SelectionOrder::Touched {
            for id in state.touch_order() {
                if self.attribute_ids.contains(&id) {
                    out.push(SelectedAttribute::new(id, state.selected_values(id)));
                }
            }
        }
        for &id in &self.attribute_ids {
            if out.get(id).is_none() {
                out.push(SelectedAttribute::new(id, state.selected_values(id)));
            }
        }
        out
    }

    /// Read the selection, recompute and emit to `sink`.
    pub fn refresh(
        &mut self,
        layout: &dyn ProductLayout,
        state: &dyn SelectionState,
        sink: &mut dyn ToggleSink,
    ) -> &AvailabilityPass {
        let selected = self.current_selection(state);
        let pass = self.recompute(&selected, layout);
        emit_pass(pass, sink);
        pass
    }
}
