//! In-memory slide wrapper: the ordered slide list and their inline styles.
//!
//! Hosts with a real document implement [`StyleTarget`](crate::gap::StyleTarget)
//! on their own element handles; this module is the reference wrapper the
//! runtime, tests and benches drive.

mod core;

pub use core::{SlideElement, SlideTrack};
