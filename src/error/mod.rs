mod types;

pub use types::{Result, SliderError};
