//! Inter-slide spacing: the gap value, its margin placement and the widths it
//! adds to or takes from the track.

mod apply;
mod component;
mod derived;
mod margin;
mod value;

pub use apply::{StyleTarget, apply_gaps, half_gap_css};
pub use component::{GapHandle, GapLifecycle, Gaps};
pub use derived::{grow, reductor, reductor_ratio};
pub use margin::{Direction, MarginPair, MarginProperty, margins_for};
pub use value::{GapInput, GapValue, to_int};
