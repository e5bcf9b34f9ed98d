//! crates/combo_io/src/hasher.rs
//!
//! SHA-256 digests over canonical JSON and raw bytes, and the `CAT:` catalog id.
//! Hex digests are always lowercase.

#![forbid(unsafe_code)]

use combo_core::{Catalog, CatalogId};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::canonical_json::canonical_json_bytes;
use crate::loader::encode_catalog;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("invalid digest: {0}")]
    InvalidHex(String),
}

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// `CAT:<hex>` over the canonical wire form of the catalog.
///
/// Two catalogs that decode to the same combinations get the same id, whatever
/// key order or whitespace the transport delivered.
pub fn catalog_id(catalog: &Catalog) -> Result<CatalogId, HashError> {
    let hex = sha256_hex(&canonical_json_bytes(&encode_catalog(catalog)));
    CatalogId::from_hex(&hex).map_err(|_| HashError::InvalidHex(hex))
}
