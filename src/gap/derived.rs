use std::num::NonZeroU32;

use super::value::GapValue;

/// Extra track width reserved for the gutters between `slide_count` slides.
///
/// An empty track reserves nothing rather than a negative gap.
pub fn grow(gap: GapValue, slide_count: usize) -> f64 {
    let gutters = slide_count.saturating_sub(1);
    f64::from(gap.get()) * gutters as f64
}

/// Width removed from each slide so `per_view` slides and their gutters fit the viewport.
pub fn reductor(gap: GapValue, per_view: NonZeroU32) -> f64 {
    let (numerator, denominator) = reductor_ratio(gap, per_view);
    numerator as f64 / denominator as f64
}

/// [`reductor`] as an exact fraction `gap * (per_view - 1) / per_view`.
pub fn reductor_ratio(gap: GapValue, per_view: NonZeroU32) -> (u64, u64) {
    let per_view = u64::from(per_view.get());
    (u64::from(gap.get()) * (per_view - 1), per_view)
}
