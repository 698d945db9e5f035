use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::Result;
use crate::logging::{Logger, METRICS_TARGET};
use crate::metrics::SliderMetrics;

use super::{EventFlow, SliderComponent, SliderContext, SliderEvent};

/// Periodically emits slider metrics snapshots through the provided logger.
///
/// Snapshots are paced by the runtime clock, so scripted runs produce the same
/// output every time.
pub struct MetricsSnapshotComponent {
    logger: Logger,
    metrics: Arc<Mutex<SliderMetrics>>,
    target: String,
    interval: Duration,
    last_emit: Option<Instant>,
    started_at: Option<Instant>,
}

impl MetricsSnapshotComponent {
    pub fn new(logger: Logger, metrics: Arc<Mutex<SliderMetrics>>) -> Self {
        Self {
            logger,
            metrics,
            target: METRICS_TARGET.to_string(),
            interval: Duration::from_secs(5),
            last_emit: None,
            started_at: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    fn emit_snapshot(&mut self, now: Instant) {
        if self.interval.is_zero() {
            return;
        }

        let started_at = *self.started_at.get_or_insert(now);
        let last = self.last_emit.unwrap_or(started_at);
        if now.duration_since(last) < self.interval {
            return;
        }

        self.last_emit = Some(now);
        if let Ok(guard) = self.metrics.lock() {
            let event = guard
                .snapshot(now.duration_since(started_at))
                .to_log_event(&self.target);
            let _ = self.logger.log_event(event);
        }
    }
}

impl SliderComponent for MetricsSnapshotComponent {
    fn name(&self) -> &str {
        "diagnostics.metrics_snapshot"
    }

    fn mount(&mut self, ctx: &mut SliderContext<'_>) -> Result<()> {
        self.started_at = Some(ctx.now());
        self.last_emit = None;
        Ok(())
    }

    fn on_event(&mut self, ctx: &mut SliderContext<'_>, event: &SliderEvent) -> Result<EventFlow> {
        if matches!(event, SliderEvent::Tick { .. }) {
            self.emit_snapshot(ctx.now());
        }
        Ok(EventFlow::Continue)
    }
}
