//! Toggle emission: one call per decided value, ascending by value id.

use combo_core::ToggleSink;

use crate::AvailabilityPass;

/// Returns the number of toggles emitted.
pub fn emit_pass(pass: &AvailabilityPass, sink: &mut dyn ToggleSink) -> usize {
    let mut n = 0;
    for (value, enabled) in pass.values.iter() {
        sink.toggle(value, enabled);
        n += 1;
    }
    n
}
