//! Burst averaging.
//!
//! Each conversion burst is reduced to its arithmetic mean with truncating
//! division.  Sums are carried in `u32`: [`MAX_BURST`] 16-bit codes cannot
//! overflow it.

/// Largest burst any supported ADC configuration returns.
pub const MAX_BURST: usize = 64;

/// Mean of a burst, or `None` for an empty one.
///
/// The result is returned wide so the caller can range-check it before
/// narrowing to an ADC code.
pub fn average(samples: &[u16]) -> Option<u32> {
    if samples.is_empty() {
        return None;
    }
    let sum: u32 = samples.iter().map(|&s| u32::from(s)).sum();
    Some(sum / samples.len() as u32)
}
