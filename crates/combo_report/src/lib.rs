//! combo_report/src/lib.rs: Pure offline report model + renderers (JSON/HTML).
//!
//! Determinism rules:
//! - No I/O here. Callers supply the pass and layout already in memory.
//! - Attributes follow product declaration order; values follow display order.
//! - Stable field order courtesy of struct layout.

#![deny(unsafe_code)]

use core::fmt;

pub mod model;
#[cfg(feature = "render_html")]
pub mod render_html;
#[cfg(feature = "render_json")]
pub mod render_json;

pub use model::{
    build_report, AttributeReport, AvailabilityReport, ReportInputs, SelectionEcho, Totals,
    TraceEcho, ValueState,
};
#[cfg(feature = "render_html")]
pub use render_html::render_html;
#[cfg(feature = "render_json")]
pub use render_json::{render_json, report_value};

// ===== Errors =====
#[derive(Debug)]
pub enum ReportError {
    Template(String),
    Serialize(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Template(m) => write!(f, "template error: {m}"),
            ReportError::Serialize(m) => write!(f, "serialize error: {m}"),
        }
    }
}

impl std::error::Error for ReportError {}
