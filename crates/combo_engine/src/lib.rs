//! combo_engine: stateful availability engine on top of `combo_algo`.
//!
//! The engine owns the fixed attribute-id set, the catalog (delivered once) and
//! the availability map. Every recomputation reads the selection fresh, runs one
//! pass and overlays its decisions; attributes outside the selection keep their
//! previous state. I/O stays in `combo_io`; `load` wires files into a session.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod emit;
pub mod engine;
pub mod load;

pub use combo_algo::{AttributeTrace, AvailabilityPass, PassKind};
pub use emit::emit_pass;
pub use engine::{AvailabilityEngine, CatalogState};
pub use load::{run_session, SessionInputs, SessionRun};

/// Single error surface for engine orchestration. `recompute` never fails.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Io(#[from] combo_io::IoError),

    /// A second catalog delivery; the stored catalog is kept.
    #[error("catalog already loaded")]
    CatalogAlreadyLoaded,

    #[error("invalid selection: {0}")]
    Selection(String),
}
