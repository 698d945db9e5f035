//! Slide spacing for a component-based slider.
//!
//! The [`Gaps`] component keeps the configured gap, writes half-gap margins on
//! every shared slide edge (never on the outer edges of the track) and exposes
//! the widths other layout code needs: [`grow`] for the track and [`reductor`]
//! for each slide. It is wired to the slider through [`SliderRuntime`], which
//! mounts components, fans out `build.after` and `update` events and drives
//! the throttled apply pass with its clock.

pub mod error;
pub mod gap;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod settings;
pub mod sizing;
pub mod throttle;
pub mod track;

pub use error::{Result, SliderError};
pub use gap::{
    Direction, GapHandle, GapInput, GapLifecycle, GapValue, Gaps, MarginPair, MarginProperty,
    StyleTarget, apply_gaps, grow, margins_for, reductor, to_int,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult,
};
pub use metrics::{MetricSnapshot, SliderMetrics};
pub use runtime::diagnostics::MetricsSnapshotComponent;
pub use runtime::shared_state::{SharedState, SharedStateError};
pub use runtime::{
    EventFlow, RuntimeConfig, SliderComponent, SliderContext, SliderEvent, SliderRuntime, Topic,
};
pub use settings::{Settings, SettingsPatch};
pub use sizing::{SlideSizing, Sizes};
pub use throttle::{DEFAULT_APPLY_THROTTLE, Throttle, TriggerOutcome};
pub use track::{SlideElement, SlideTrack};
