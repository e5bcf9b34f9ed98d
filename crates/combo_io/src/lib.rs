//! crates/combo_io/src/lib.rs
//! I/O layer for the availability engine.
//!
//! - `loader`: catalog wire codec (`Attributes` / `Id` / `ValueIds` / `InStock`),
//!   product layout and selection files.
//! - `manifest`: session manifest (catalog + product + optional selection), offline only.
//! - `canonical_json` / `hasher`: deterministic bytes and `CAT:` catalog ids.
//! - `transport`: file-backed single-shot catalog transport.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for combo_io.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("read error: {0}")]
    Read(std::io::Error),

    #[error("write error: {0}")]
    Write(std::io::Error),

    /// JSON serialization/deserialization errors with a JSON Pointer hint.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    #[error("manifest error: {0}")]
    Manifest(String),

    /// Declared expectation (e.g. catalog digest) did not hold.
    #[error("expectation failed: {0}")]
    Expect(String),

    #[error("canonicalization error: {0}")]
    Canon(String),

    #[error("hash error: {0}")]
    Hash(String),

    #[error("path error: {0}")]
    Path(String),

    /// Input exceeded a size limit.
    #[error("limit exceeded: {0}")]
    Limit(String),

    /// Generic validation / invariants.
    #[error("invalid: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Read(e)
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; callers may enrich this.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

impl From<hasher::HashError> for IoError {
    fn from(e: hasher::HashError) -> Self {
        IoError::Hash(e.to_string())
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod manifest;
pub mod transport;
