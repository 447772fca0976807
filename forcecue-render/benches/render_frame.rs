use forcecue_core::{Band, PlaybackState, Settings, Tempo};
use forcecue_playback::{PlaybackView, TrialKey};
use forcecue_render::{find_font, SkiaRenderer};
use forcecue_timing::HighPrecisionTimer;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use pprof::criterion::{Output, PProfProfiler};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn harness() -> (SkiaRenderer, Vec<u8>, HighPrecisionTimer) {
    let r = SkiaRenderer::new(WIDTH, HEIGHT, find_font(None)).unwrap();
    let fb = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
    (r, fb, HighPrecisionTimer::new())
}

fn critical_view(force: f64) -> PlaybackView {
    PlaybackView {
        state: PlaybackState::Running,
        dataset: TrialKey::Surgeon1Trial3,
        elapsed: 12.34,
        end_time: 40.0,
        current_force: Some(force),
        last_alert: Some(Band::Critical),
        tempo: Tempo(400),
    }
}

pub fn bench_monitor_frame(c: &mut Criterion) {
    let mut g = c.benchmark_group("render_frame");
    g.sample_size(40);
    let settings = Settings::default();

    g.bench_function("cold_text_cache", |b| {
        b.iter_batched(
            harness,
            |(mut r, mut fb, mut t)| {
                let stats = r.render_frame(&critical_view(0.0912), &settings, &mut fb, &mut t);
                black_box(stats).ok();
            },
            BatchSize::LargeInput,
        )
    });

    let (mut r, mut fb, mut t) = harness();
    let mut step = 0u32;
    g.bench_function("warm_changing_force", |b| {
        b.iter(|| {
            step = (step + 1) % 100;
            let view = critical_view(0.05 + step as f64 * 0.0005);
            black_box(r.render_frame(&view, &settings, &mut fb, &mut t)).ok();
        })
    });

    g.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = bench_monitor_frame
}
criterion_main!(benches);
