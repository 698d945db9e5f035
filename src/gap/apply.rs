use super::margin::{Direction, MarginProperty, margins_for};
use super::value::GapValue;

/// Anything that accepts inline margin writes. An empty value clears the property.
pub trait StyleTarget {
    fn set_style(&mut self, property: MarginProperty, value: &str);
}

/// CSS length for half of `gap`, e.g. `"10px"` or `"7.5px"`.
pub fn half_gap_css(gap: GapValue) -> String {
    let px = gap.get();
    if px % 2 == 0 {
        format!("{}px", px / 2)
    } else {
        format!("{}.5px", px / 2)
    }
}

/// Writes half-gap margins on every shared edge and clears the two outer edges.
///
/// The first slide gets no leading margin and the last no trailing margin, so
/// gutters only ever appear between slides. Running it again with the same
/// inputs leaves the styles untouched in value.
pub fn apply_gaps<T: StyleTarget>(slides: &mut [T], direction: Direction, gap: GapValue) {
    let margins = margins_for(direction);
    let half = half_gap_css(gap);
    let last = slides.len().saturating_sub(1);

    for (idx, slide) in slides.iter_mut().enumerate() {
        let leading = if idx == 0 { "" } else { half.as_str() };
        let trailing = if idx == last { "" } else { half.as_str() };
        slide.set_style(margins.leading, leading);
        slide.set_style(margins.trailing, trailing);
    }
}
