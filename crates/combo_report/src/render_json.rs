//! JSON renderer. Field order follows the model's struct layout.

use serde_json::Value;

use crate::{AvailabilityReport, ReportError};

pub fn report_value(report: &AvailabilityReport) -> Result<Value, ReportError> {
    serde_json::to_value(report).map_err(|e| ReportError::Serialize(e.to_string()))
}

/// Pretty-printed, trailing newline.
pub fn render_json(report: &AvailabilityReport) -> Result<String, ReportError> {
    let mut s = serde_json::to_string_pretty(report).map_err(|e| ReportError::Serialize(e.to_string()))?;
    s.push('\n');
    Ok(s)
}
