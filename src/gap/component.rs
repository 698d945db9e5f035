use std::num::NonZeroU32;
use std::sync::{Arc, RwLock};

use serde_json::json;

use crate::Result;
use crate::logging::{GAPS_TARGET, LogLevel, json_kv};
use crate::runtime::shared_state::SharedStateError;
use crate::runtime::{EventFlow, SliderComponent, SliderContext, SliderEvent};
use crate::throttle::{DEFAULT_APPLY_THROTTLE, Throttle, TriggerOutcome};

use super::apply::{apply_gaps, half_gap_css};
use super::derived;
use super::value::{GapInput, GapValue};

/// Shared, lockable gap value other components read through [`SharedState`].
///
/// [`SharedState`]: crate::runtime::shared_state::SharedState
#[derive(Debug, Default)]
pub struct GapHandle {
    value: RwLock<GapValue>,
}

impl GapHandle {
    pub fn new(value: GapValue) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    pub fn value(&self) -> GapValue {
        match self.value.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, raw: impl Into<GapInput>) {
        let mut guard = match self.value.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.set(raw);
    }

    pub fn grow(&self, slide_count: usize) -> f64 {
        derived::grow(self.value(), slide_count)
    }

    pub fn reductor(&self, per_view: NonZeroU32) -> f64 {
        derived::reductor(self.value(), per_view)
    }
}

/// Where the gaps component sits in its mount/apply cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapLifecycle {
    Uninitialized,
    Mounted,
    Applied,
}

/// Slider component that spaces slides apart.
///
/// Mounting reads the configured gap. A `build.after` or `update` event
/// schedules an apply pass behind a trailing throttle; the pass runs on the
/// first tick after the quiet period and reads gap, direction and slides as
/// they are at that moment. `update` also remounts first, so a live gap change
/// is always what gets applied.
pub struct Gaps {
    handle: Arc<GapHandle>,
    throttle: Throttle,
    state: GapLifecycle,
    published: bool,
}

impl Gaps {
    pub fn new() -> Self {
        Self {
            handle: Arc::new(GapHandle::default()),
            throttle: Throttle::new(DEFAULT_APPLY_THROTTLE),
            state: GapLifecycle::Uninitialized,
            published: false,
        }
    }

    pub fn handle(&self) -> Arc<GapHandle> {
        Arc::clone(&self.handle)
    }

    pub fn value(&self) -> GapValue {
        self.handle.value()
    }

    pub fn set_value(&self, raw: impl Into<GapInput>) {
        self.handle.set(raw);
    }

    pub fn lifecycle(&self) -> GapLifecycle {
        self.state
    }

    pub fn is_apply_pending(&self) -> bool {
        self.throttle.is_pending()
    }

    pub fn grow(&self, slide_count: usize) -> f64 {
        self.handle.grow(slide_count)
    }

    pub fn reductor(&self, per_view: NonZeroU32) -> f64 {
        self.handle.reductor(per_view)
    }

    /// Read the gap from settings and publish the handle for other components.
    pub fn mount_gap(&mut self, ctx: &mut SliderContext<'_>) -> Result<()> {
        self.handle.set(ctx.settings().gap.clone());
        self.throttle.set_wait(ctx.settings().apply_throttle());
        self.publish(ctx)?;
        self.state = GapLifecycle::Mounted;

        let value = self.value().get();
        ctx.with_metrics(|m| m.record_mount());
        ctx.log(
            LogLevel::Debug,
            GAPS_TARGET,
            "gap_mounted",
            [
                json_kv("raw", json!(ctx.settings().gap.to_string())),
                json_kv("gap_px", json!(value)),
            ],
        );
        Ok(())
    }

    /// Write half-gap margins onto the current slide list.
    pub fn apply(&mut self, ctx: &mut SliderContext<'_>) {
        let direction = ctx.direction();
        let gap = self.value();
        let before = ctx.track().style_digest();
        let writes_before = ctx.track().total_writes();

        apply_gaps(ctx.track_mut().slides_mut(), direction, gap);
        self.state = GapLifecycle::Applied;

        let slides = ctx.slide_count();
        let changed = before != ctx.track().style_digest();
        let writes = ctx.track().total_writes() - writes_before;
        ctx.with_metrics(|m| m.record_apply(writes));
        ctx.log(
            LogLevel::Debug,
            GAPS_TARGET,
            "gap_applied",
            [
                json_kv("gap_px", json!(gap.get())),
                json_kv("half", json!(half_gap_css(gap))),
                json_kv("direction", json!(direction.as_str())),
                json_kv("slides", json!(slides)),
                json_kv("writes", json!(writes)),
                json_kv("changed", json!(changed)),
            ],
        );
    }

    fn schedule_apply(&mut self, ctx: &mut SliderContext<'_>) {
        if self.throttle.trigger(ctx.now()) == TriggerOutcome::Coalesced {
            ctx.with_metrics(|m| m.record_coalesced());
        }
    }

    fn publish(&mut self, ctx: &mut SliderContext<'_>) -> Result<()> {
        if self.published {
            return Ok(());
        }
        match ctx.shared_state().insert_arc(self.handle()) {
            Ok(()) => {}
            Err(SharedStateError::AlreadyExists) => {
                ctx.log(
                    LogLevel::Warn,
                    GAPS_TARGET,
                    "gap_handle_already_published",
                    std::iter::empty(),
                );
            }
            Err(err) => return Err(err.into()),
        }
        self.published = true;
        Ok(())
    }
}

impl Default for Gaps {
    fn default() -> Self {
        Self::new()
    }
}

impl SliderComponent for Gaps {
    fn name(&self) -> &str {
        "gaps"
    }

    fn mount(&mut self, ctx: &mut SliderContext<'_>) -> Result<()> {
        self.mount_gap(ctx)
    }

    fn on_event(&mut self, ctx: &mut SliderContext<'_>, event: &SliderEvent) -> Result<EventFlow> {
        match event {
            SliderEvent::Update => {
                self.mount_gap(ctx)?;
                self.schedule_apply(ctx);
            }
            SliderEvent::BuildAfter => self.schedule_apply(ctx),
            SliderEvent::Tick { .. } => {
                if self.throttle.poll(ctx.now()) {
                    self.apply(ctx);
                }
            }
        }
        Ok(EventFlow::Continue)
    }
}
