use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated while the slider runs.
#[derive(Debug, Default, Clone)]
pub struct SliderMetrics {
    events: u64,
    mounts: u64,
    applies: u64,
    style_writes: u64,
    coalesced: u64,
}

impl SliderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_mount(&mut self) {
        self.mounts = self.mounts.saturating_add(1);
    }

    pub fn record_apply(&mut self, style_writes: usize) {
        self.applies = self.applies.saturating_add(1);
        self.style_writes = self.style_writes.saturating_add(style_writes as u64);
    }

    /// A trigger landed while an apply was already pending.
    pub fn record_coalesced(&mut self) {
        self.coalesced = self.coalesced.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            mounts: self.mounts,
            applies: self.applies,
            style_writes: self.style_writes,
            coalesced: self.coalesced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub mounts: u64,
    pub applies: u64,
    pub style_writes: u64,
    pub coalesced: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("mounts".to_string(), json!(self.mounts));
        map.insert("applies".to_string(), json!(self.applies));
        map.insert("style_writes".to_string(), json!(self.style_writes));
        map.insert("coalesced".to_string(), json!(self.coalesced));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "slider_metrics", self.as_fields())
    }
}
