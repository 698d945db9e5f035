//! Slide and wrapper widths, corrected for gutters.
//!
//! Sizing never receives the gap; it pulls the published [`GapHandle`] each
//! time it recomputes.

use std::num::NonZeroU32;

use serde_json::json;

use crate::Result;
use crate::gap::{GapHandle, GapValue, grow, reductor};
use crate::logging::{LogLevel, json_kv};
use crate::runtime::shared_state::SharedStateError;
use crate::runtime::{EventFlow, SliderComponent, SliderContext, SliderEvent};

pub const SIZES_TARGET: &str = "slider::sizes";

/// Widths for one layout pass, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideSizing {
    pub slide_width: f64,
    pub wrapper_width: f64,
}

impl SlideSizing {
    /// Each slide gets its share of the viewport minus the reductor; the
    /// wrapper holds every slide plus the gutters between them.
    pub fn compute(
        viewport_width: f64,
        per_view: NonZeroU32,
        slide_count: usize,
        gap: GapValue,
    ) -> Self {
        let slide_width = viewport_width / f64::from(per_view.get()) - reductor(gap, per_view);
        let wrapper_width = slide_width * slide_count as f64 + grow(gap, slide_count);
        Self {
            slide_width,
            wrapper_width,
        }
    }
}

/// Recomputes sizing whenever the structure is built or settings change.
pub struct Sizes {
    viewport_width: f64,
    last: Option<SlideSizing>,
}

impl Sizes {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            last: None,
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn last(&self) -> Option<SlideSizing> {
        self.last
    }

    fn recompute(&mut self, ctx: &mut SliderContext<'_>) -> Result<()> {
        let handle = match ctx.shared::<GapHandle>() {
            Ok(handle) => handle,
            Err(SharedStateError::Missing) => {
                ctx.log(LogLevel::Debug, SIZES_TARGET, "gap_handle_missing", std::iter::empty());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let sizing = SlideSizing::compute(
            self.viewport_width,
            ctx.settings().per_view,
            ctx.slide_count(),
            handle.value(),
        );
        self.last = Some(sizing);
        ctx.log(
            LogLevel::Trace,
            SIZES_TARGET,
            "sizes_computed",
            [
                json_kv("slide_width", json!(sizing.slide_width)),
                json_kv("wrapper_width", json!(sizing.wrapper_width)),
            ],
        );
        Ok(())
    }
}

impl SliderComponent for Sizes {
    fn name(&self) -> &str {
        "sizes"
    }

    fn on_event(&mut self, ctx: &mut SliderContext<'_>, event: &SliderEvent) -> Result<EventFlow> {
        if matches!(event, SliderEvent::BuildAfter | SliderEvent::Update) {
            self.recompute(ctx)?;
        }
        Ok(EventFlow::Continue)
    }
}
