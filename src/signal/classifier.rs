//! Band classifier.
//!
//! Horn is checked first, then shift-up, then shift-down.  Validated tables
//! never overlap, so the order only matters for a table that skipped
//! [`ThresholdTable::validate`].

use super::SignalClass;
use crate::config::{AdcBand, ThresholdTable};

fn in_band(band: Option<AdcBand>, sample: u16) -> bool {
    band.is_some_and(|b| b.contains(sample))
}

/// Map one averaged ADC code onto its signal class.
pub fn classify(sample: u16, table: &ThresholdTable) -> SignalClass {
    if in_band(table.horn, sample) {
        SignalClass::HornOn
    } else if in_band(table.shift_up, sample) {
        SignalClass::ShiftUp
    } else if in_band(table.shift_down, sample) {
        SignalClass::ShiftDown
    } else {
        SignalClass::Idle
    }
}
