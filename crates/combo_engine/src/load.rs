//! Session loading: manifest (or explicit paths) → product + selection + catalog
//! → one engine pass. Offline only; all JSON goes through `combo_io`.
//!
//! The catalog is fetched through `FileCatalogTransport`, so a catalog that
//! exists but cannot be decoded follows the engine's fetch-failure rule (empty
//! catalog, nothing decided on delivery) and is reported in
//! `SessionRun::catalog_error`. The session's selection is then applied with a
//! refresh, which is where the empty catalog disables every value. Missing inputs,
//! a bad product layout, a bad selection file and a digest mismatch are errors.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use combo_core::{
    CatalogId, CatalogTransport, EngineConfig, FormSelection, ProductAttributes,
    ProductLayout, Selection, SelectionOrder, ValueAvailability,
};
use combo_io::{
    hasher,
    loader,
    manifest::{self, Manifest, ResolvedManifest},
    transport::FileCatalogTransport,
    IoError,
};
use tracing::{debug, info};

use crate::{AvailabilityEngine, AvailabilityPass, EngineError};

/// Where a session's inputs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInputs {
    pub resolved: ResolvedManifest,
}

impl SessionInputs {
    pub fn from_manifest(path: &Path) -> Result<Self, EngineError> {
        let resolved = manifest::load_and_resolve_manifest(path)?;
        debug!(manifest = %path.display(), "manifest resolved");
        Ok(Self { resolved })
    }

    /// Explicit paths, checked the same way manifest entries are.
    pub fn from_paths(
        catalog: &Path,
        product: &Path,
        selection: Option<&Path>,
    ) -> Result<Self, EngineError> {
        let man = Manifest {
            catalog_path: path_str(catalog)?,
            product_path: path_str(product)?,
            selection_path: selection.map(path_str).transpose()?,
            catalog_sha256: None,
            selection_order: None,
        };
        let resolved = manifest::resolve(&man, Path::new("."))?;
        Ok(Self { resolved })
    }

    pub fn catalog_path(&self) -> &Path { &self.resolved.catalog_path }
    pub fn product_path(&self) -> &Path { &self.resolved.product_path }
    pub fn selection_path(&self) -> Option<&PathBuf> { self.resolved.selection_path.as_ref() }

    /// Manifest order wins unless the caller overrides it.
    pub fn selection_order(&self, overridden: Option<SelectionOrder>) -> SelectionOrder {
        overridden.or(self.resolved.selection_order).unwrap_or_default()
    }
}

fn path_str(p: &Path) -> Result<String, EngineError> {
    p.to_str()
        .map(str::to_owned)
        .ok_or_else(|| EngineError::Io(IoError::Path(format!("non-utf8 path: {}", p.display()))))
}

/// Everything one session pass produced.
#[derive(Debug, Clone)]
pub struct SessionRun {
    pub product: ProductAttributes,
    /// The ordered selection the pass ran over.
    pub selection: Selection,
    pub order: SelectionOrder,
    pub pass: AvailabilityPass,
    pub availability: ValueAvailability,
    /// Digest of the decoded catalog; `None` when the fetch failed.
    pub catalog_id: Option<CatalogId>,
    pub catalog_error: Option<String>,
}

/// Load the session and run one pass.
///
/// `extra` entries are applied on top of the selection file, in order; an
/// entry with no values clears that attribute.
pub fn run_session(
    inputs: &SessionInputs,
    order: Option<SelectionOrder>,
    extra: &Selection,
) -> Result<SessionRun, EngineError> {
    let product = loader::load_product(inputs.product_path())?;
    let order = inputs.selection_order(order);

    let mut form = FormSelection::new();
    if let Some(p) = inputs.selection_path() {
        apply_selection(&mut form, &product, &loader::load_selection(p)?)?;
    }
    apply_selection(&mut form, &product, extra)?;

    let mut transport = FileCatalogTransport::new(inputs.catalog_path());

    // Digest check needs the decoded catalog before the engine sees it.
    let fetched = transport.fetch();
    let (catalog_id, catalog_error) = match &fetched {
        Ok(c) => {
            manifest::verify_catalog_digest(&inputs.resolved, c)?;
            (Some(hasher::catalog_id(c).map_err(IoError::from)?), None)
        }
        Err(e) => (None, Some(e.to_string())),
    };

    let mut engine = AvailabilityEngine::for_layout(&product, EngineConfig { selection_order: order });
    let mut availability = ValueAvailability::new();
    // A failed fetch decides nothing on delivery; the session's selection is
    // then applied as the next selection-driven pass.
    let pass = match engine.on_catalog_loaded(fetched, &product, &form, &mut availability)? {
        Some(pass) => pass.clone(),
        None => engine.refresh(&product, &form, &mut availability).clone(),
    };
    let selection = engine.current_selection(&form);

    info!(
        kind = pass.kind.as_str(),
        enabled = availability.enabled().count(),
        disabled = availability.disabled().count(),
        "session pass complete"
    );

    Ok(SessionRun { product, selection, order, pass, availability, catalog_id, catalog_error })
}

fn apply_selection(
    form: &mut FormSelection,
    product: &ProductAttributes,
    selection: &Selection,
) -> Result<(), EngineError> {
    let known = product.attribute_ids();
    for s in selection.iter() {
        if !known.contains(&s.attribute_id) {
            return Err(EngineError::Selection(format!(
                "attribute {} is not part of the product",
                s.attribute_id
            )));
        }
        form.set(s.attribute_id, s.values.iter().copied());
    }
    Ok(())
}
