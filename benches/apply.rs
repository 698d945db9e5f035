use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use slider_gaps::logging::NullSink;
use slider_gaps::{
    Direction, GapValue, Gaps, Logger, Settings, SettingsPatch, SlideTrack, SliderEvent,
    SliderRuntime, apply_gaps,
};

const WINDOW: Duration = Duration::from_millis(30);

fn apply_pass(c: &mut Criterion) {
    let gap = GapValue::new(24u32);
    c.bench_function("apply_gaps_1000_slides", |b| {
        let mut track = SlideTrack::with_slides(1000);
        b.iter(|| {
            apply_gaps(track.slides_mut(), black_box(Direction::Rtl), black_box(gap));
        });
    });
}

fn update_burst(c: &mut Criterion) {
    let script = burst_script();
    c.bench_function("runtime_update_burst", |b| {
        b.iter(|| {
            let mut runtime = build_runtime();
            runtime
                .run_scripted(black_box(script.clone()))
                .expect("scripted run");
            for gap in [12u32, 16, 20] {
                runtime
                    .update(SettingsPatch::new().gap(gap))
                    .expect("update");
            }
            runtime.advance(WINDOW).expect("advance");
        });
    });
}

fn build_runtime() -> SliderRuntime {
    let settings = Settings::default()
        .with_gap("10")
        .with_per_view(3)
        .expect("per view");
    let mut runtime = SliderRuntime::new(settings, SlideTrack::with_slides(120));
    {
        let config = runtime.config_mut();
        config.logger = Some(Logger::new(NullSink));
        config.enable_metrics();
    }
    runtime.register_component(Gaps::new()).expect("register gaps");
    runtime
}

fn burst_script() -> Vec<SliderEvent> {
    let mut events = vec![SliderEvent::BuildAfter];
    for _ in 0..8 {
        events.push(SliderEvent::Update);
        events.push(SliderEvent::Tick {
            elapsed: Duration::from_millis(5),
        });
    }
    events.push(SliderEvent::Tick { elapsed: WINDOW });
    events
}

criterion_group!(benches, apply_pass, update_burst);
criterion_main!(benches);
