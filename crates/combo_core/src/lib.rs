//! combo_core: Core types for the combination availability engine.
//!
//! This crate is **I/O-free**. It defines the stable types used across the
//! workspace (`combo_io`, `combo_algo`, `combo_engine`, `combo_report`, `combo_cli`):
//!
//! - Identifiers: `AttributeId`, `ValueId`, `CatalogId`
//! - Catalog records: `AttributeRow`, `Combination`, `Catalog`
//! - Selection: `SelectedAttribute`, `Selection` (ordered)
//! - Output: `ValueAvailability`
//! - Collaborator traits: `ProductLayout`, `SelectionState`, `ToggleSink`, `CatalogTransport`
//! - Variables: `SelectionOrder`, `EngineConfig`
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    use crate::ids::{AttributeId, ValueId};

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        DuplicateAttribute(AttributeId),
        SharedValue { value: ValueId, first: AttributeId, second: AttributeId },
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::DuplicateAttribute(a) => write!(f, "attribute {a} declared twice"),
                CoreError::SharedValue { value, first, second } => {
                    write!(f, "value {value} belongs to attributes {first} and {second}")
                }
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod collab;
pub mod entities;
pub mod ids;
pub mod variables;

pub use collab::{CatalogTransport, FormSelection, ProductLayout, SelectionState, ToggleSink};
pub use entities::{
    AttributeRow, Catalog, Combination, ProductAttribute, ProductAttributes, SelectedAttribute,
    Selection, ValueAvailability, ValueSet,
};
pub use errors::CoreError;
pub use ids::{AttributeId, CatalogId, IdError, ValueId};
pub use variables::{EngineConfig, SelectionOrder};
