use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;

use crate::error::{Result, SliderError};
use crate::gap::Direction;
use crate::logging::{LogLevel, Logger, RUNTIME_TARGET, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, SliderMetrics};
use crate::settings::{Settings, SettingsPatch};
use crate::track::SlideTrack;

pub mod diagnostics;
pub mod shared_state;

use shared_state::{SharedState, SharedStateError};

/// Ambient plumbing handed to every component.
#[derive(Clone, Default)]
pub struct RuntimeConfig {
    /// Optional structured logger used by the runtime and its components.
    pub logger: Option<Logger>,
    /// Counters shared with components and diagnostics.
    pub metrics: Option<Arc<Mutex<SliderMetrics>>>,
}

impl RuntimeConfig {
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(SliderMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<SliderMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Named topics on the slider event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Slide structure has been built (or rebuilt).
    BuildAfter,
    /// Settings changed through the API.
    Update,
    /// Runtime clock advanced.
    Tick,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::BuildAfter => "build.after",
            Topic::Update => "update",
            Topic::Tick => "tick",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = SliderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "build.after" => Ok(Topic::BuildAfter),
            "update" => Ok(Topic::Update),
            "tick" => Ok(Topic::Tick),
            other => Err(SliderError::UnknownEvent(other.to_string())),
        }
    }
}

/// Events delivered to components, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliderEvent {
    BuildAfter,
    Update,
    Tick { elapsed: Duration },
}

impl SliderEvent {
    pub fn topic(&self) -> Topic {
        match self {
            SliderEvent::BuildAfter => Topic::BuildAfter,
            SliderEvent::Update => Topic::Update,
            SliderEvent::Tick { .. } => Topic::Tick,
        }
    }
}

/// Control the propagation of an event across components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Consumed,
}

/// View of the slider handed to a component while it runs.
///
/// Everything is read at call time: settings, direction and the slide list
/// reflect whatever the runtime holds right now.
pub struct SliderContext<'a> {
    settings: &'a Settings,
    direction: Direction,
    track: &'a mut SlideTrack,
    shared: &'a SharedState,
    config: &'a RuntimeConfig,
    now: Instant,
}

impl<'a> SliderContext<'a> {
    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn slide_count(&self) -> usize {
        self.track.len()
    }

    pub fn track(&self) -> &SlideTrack {
        &*self.track
    }

    pub fn track_mut(&mut self) -> &mut SlideTrack {
        &mut *self.track
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn shared_state(&self) -> &SharedState {
        self.shared
    }

    pub fn shared<T>(&self) -> std::result::Result<Arc<T>, SharedStateError>
    where
        T: Send + Sync + 'static,
    {
        self.shared.get::<T>()
    }

    pub fn logger(&self) -> Option<&Logger> {
        self.config.logger.as_ref()
    }

    pub fn log<I>(&self, level: LogLevel, target: &str, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            if logger.enabled(level) {
                let _ = logger.log_event(event_with_fields(level, target, message, fields));
            }
        }
    }

    pub fn with_metrics(&self, record: impl FnOnce(&mut SliderMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }
}

/// Behaviour injection point for the slider.
pub trait SliderComponent: Send {
    fn name(&self) -> &str {
        "slider_component"
    }

    /// Runs once when the component is registered.
    fn mount(&mut self, _ctx: &mut SliderContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_event(&mut self, _ctx: &mut SliderContext<'_>, _event: &SliderEvent) -> Result<EventFlow> {
        Ok(EventFlow::Continue)
    }
}

/// State the runtime lends to components through [`SliderContext`].
struct SliderHost {
    settings: Settings,
    direction: Direction,
    track: SlideTrack,
    shared: SharedState,
    config: RuntimeConfig,
    now: Instant,
}

impl SliderHost {
    fn context(&mut self) -> SliderContext<'_> {
        SliderContext {
            settings: &self.settings,
            direction: self.direction,
            track: &mut self.track,
            shared: &self.shared,
            config: &self.config,
            now: self.now,
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, RUNTIME_TARGET, message, fields));
        }
    }
}

/// Slider instance: owns settings, the slide track and its components, and
/// fans events out to them synchronously.
pub struct SliderRuntime {
    host: SliderHost,
    components: Vec<Box<dyn SliderComponent>>,
    started_at: Instant,
}

impl SliderRuntime {
    pub fn new(settings: Settings, track: SlideTrack) -> Self {
        Self::with_clock(settings, track, Instant::now())
    }

    /// Start the runtime clock at `start`. Time only moves through [`advance`](Self::advance).
    pub fn with_clock(settings: Settings, track: SlideTrack, start: Instant) -> Self {
        let direction = settings.direction;
        Self {
            host: SliderHost {
                settings,
                direction,
                track,
                shared: SharedState::new(),
                config: RuntimeConfig::default(),
                now: start,
            },
            components: Vec::new(),
            started_at: start,
        }
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.host.config
    }

    pub fn settings(&self) -> &Settings {
        &self.host.settings
    }

    pub fn direction(&self) -> Direction {
        self.host.direction
    }

    pub fn track(&self) -> &SlideTrack {
        &self.host.track
    }

    pub fn shared(&self) -> &SharedState {
        &self.host.shared
    }

    pub fn now(&self) -> Instant {
        self.host.now
    }

    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Register and immediately mount a component.
    pub fn register_component<C>(&mut self, component: C) -> Result<()>
    where
        C: SliderComponent + 'static,
    {
        let mut component: Box<dyn SliderComponent> = Box::new(component);
        {
            let mut ctx = self.host.context();
            component.mount(&mut ctx)?;
        }
        self.host.log(
            LogLevel::Debug,
            "component_mounted",
            [json_kv("component", json!(component.name()))],
        );
        self.components.push(component);
        Ok(())
    }

    /// Signal that the slide structure is built.
    pub fn mount(&mut self) -> Result<()> {
        self.host.log(
            LogLevel::Info,
            "slider_mounted",
            [
                json_kv("components", json!(self.components.len())),
                json_kv("slides", json!(self.host.track.len())),
            ],
        );
        self.emit(SliderEvent::BuildAfter).map(|_| ())
    }

    /// Replace the slide list and announce the new structure.
    pub fn rebuild(&mut self, slide_count: usize) -> Result<()> {
        self.host.track.rebuild(slide_count);
        self.emit(SliderEvent::BuildAfter).map(|_| ())
    }

    /// Merge `patch` into the settings and notify components.
    pub fn update(&mut self, patch: SettingsPatch) -> Result<()> {
        self.host.settings.merge(patch);
        self.host.direction = self.host.settings.direction;
        self.emit(SliderEvent::Update).map(|_| ())
    }

    /// Move the runtime clock forward and deliver a tick.
    pub fn advance(&mut self, elapsed: Duration) -> Result<()> {
        self.host.now += elapsed;
        self.emit(SliderEvent::Tick { elapsed }).map(|_| ())
    }

    pub fn emit_named(&mut self, name: &str) -> Result<EventFlow> {
        let event = match name.parse::<Topic>()? {
            Topic::BuildAfter => SliderEvent::BuildAfter,
            Topic::Update => SliderEvent::Update,
            Topic::Tick => SliderEvent::Tick {
                elapsed: Duration::ZERO,
            },
        };
        self.emit(event)
    }

    pub fn emit(&mut self, event: SliderEvent) -> Result<EventFlow> {
        let mut flow = EventFlow::Continue;
        for component in self.components.iter_mut() {
            let mut ctx = self.host.context();
            if component.on_event(&mut ctx, &event)? == EventFlow::Consumed {
                flow = EventFlow::Consumed;
                break;
            }
        }

        if let Some(metrics) = self.host.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_event();
            }
        }
        if !matches!(event, SliderEvent::Tick { .. }) {
            self.host.log(
                LogLevel::Debug,
                "event_dispatched",
                [
                    json_kv("event", json!(event.topic().as_str())),
                    json_kv("consumed", json!(flow == EventFlow::Consumed)),
                ],
            );
        }
        Ok(flow)
    }

    /// Drive a fixed sequence of events; ticks advance the clock.
    pub fn run_scripted<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = SliderEvent>,
    {
        for event in events {
            match event {
                SliderEvent::Tick { elapsed } => self.advance(elapsed)?,
                other => {
                    self.emit(other)?;
                }
            }
        }
        Ok(())
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.host.config.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.host.now.duration_since(self.started_at)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;

    #[derive(Default)]
    struct Recorder {
        label: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
        consume: Option<Topic>,
    }

    impl SliderComponent for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn mount(&mut self, _ctx: &mut SliderContext<'_>) -> Result<()> {
            self.seen.lock().unwrap().push(format!("{}:mount", self.label));
            Ok(())
        }

        fn on_event(
            &mut self,
            ctx: &mut SliderContext<'_>,
            event: &SliderEvent,
        ) -> Result<EventFlow> {
            self.seen.lock().unwrap().push(format!(
                "{}:{}:{}",
                self.label,
                event.topic(),
                ctx.direction()
            ));
            if self.consume == Some(event.topic()) {
                return Ok(EventFlow::Consumed);
            }
            Ok(EventFlow::Continue)
        }
    }

    fn runtime() -> SliderRuntime {
        SliderRuntime::new(Settings::default(), SlideTrack::with_slides(3))
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut rt = runtime();
        for label in ["a", "b"] {
            rt.register_component(Recorder {
                label,
                seen: seen.clone(),
                consume: None,
            })
            .unwrap();
        }
        rt.mount().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["a:mount", "b:mount", "a:build.after:ltr", "b:build.after:ltr"]
        );
        assert_eq!(rt.component_names(), vec!["a", "b"]);
    }

    #[test]
    fn consumed_event_stops_propagation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut rt = runtime();
        rt.register_component(Recorder {
            label: "first",
            seen: seen.clone(),
            consume: Some(Topic::Update),
        })
        .unwrap();
        rt.register_component(Recorder {
            label: "second",
            seen: seen.clone(),
            consume: None,
        })
        .unwrap();
        seen.lock().unwrap().clear();

        let flow = rt.emit(SliderEvent::Update).unwrap();
        assert_eq!(flow, EventFlow::Consumed);
        assert_eq!(*seen.lock().unwrap(), vec!["first:update:ltr"]);
    }

    #[test]
    fn update_resolves_direction_before_dispatch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut rt = runtime();
        rt.register_component(Recorder {
            label: "r",
            seen: seen.clone(),
            consume: None,
        })
        .unwrap();
        rt.update(SettingsPatch::new().direction(Direction::Rtl))
            .unwrap();

        assert_eq!(rt.direction(), Direction::Rtl);
        assert_eq!(seen.lock().unwrap().last().unwrap(), "r:update:rtl");
    }

    #[test]
    fn named_events_resolve_topics() {
        let mut rt = runtime();
        assert_eq!(rt.emit_named("build.after").unwrap(), EventFlow::Continue);
        let err = rt.emit_named("resize").unwrap_err();
        assert!(matches!(err, SliderError::UnknownEvent(name) if name == "resize"));
    }

    #[test]
    fn scripted_ticks_advance_clock_and_count_events() {
        let start = Instant::now();
        let mut rt = SliderRuntime::with_clock(Settings::default(), SlideTrack::new(), start);
        rt.config_mut().enable_metrics();
        rt.run_scripted([
            SliderEvent::BuildAfter,
            SliderEvent::Tick {
                elapsed: Duration::from_millis(16),
            },
            SliderEvent::Tick {
                elapsed: Duration::from_millis(16),
            },
        ])
        .unwrap();

        assert_eq!(rt.now(), start + Duration::from_millis(32));
        let snap = rt.metrics_snapshot().unwrap();
        assert_eq!(snap.events, 3);
        assert_eq!(snap.uptime_ms, 32);
    }

    #[test]
    fn disabled_metrics_stop_counting() {
        let mut rt = runtime();
        rt.config_mut().enable_metrics();
        rt.mount().unwrap();
        assert_eq!(rt.metrics_snapshot().unwrap().events, 1);

        rt.config_mut().disable_metrics();
        rt.emit(SliderEvent::Update).unwrap();
        assert!(rt.metrics_snapshot().is_none());
        assert!(rt.config_mut().metrics_handle().is_none());
    }

    #[test]
    fn dispatch_is_logged_without_ticks() {
        let sink = Arc::new(MemorySink::new());
        let mut rt = runtime();
        rt.config_mut().logger = Some(Logger::from_shared(sink.clone()));
        rt.mount().unwrap();
        rt.advance(Duration::from_millis(5)).unwrap();

        assert_eq!(sink.messages(), vec!["slider_mounted", "event_dispatched"]);
    }
}
