//! Stabilization Benchmarks
//!
//! Measures the per-frame cost of the filter and of a full pipeline move
//! against an in-memory device.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::{Duration, Instant};

use remote_pointer_server::cursor::{
    ButtonState, ClickKind, MouseButton, PlatformCursor, PlatformResult, PointerDevice,
};
use remote_pointer_server::input::{MotionConfig, MotionPipeline};
use remote_pointer_server::stabilizer::{StabilizationConfig, StabilizationFilter};

/// Device that only tracks position, so no event logging is measured
struct NullPointer {
    position: (i32, i32),
}

impl PointerDevice for NullPointer {
    fn move_absolute(&mut self, x: i32, y: i32) -> PlatformResult<()> {
        self.position = (x, y);
        Ok(())
    }
    fn move_relative(&mut self, dx: i32, dy: i32) -> PlatformResult<()> {
        self.position = (self.position.0 + dx, self.position.1 + dy);
        Ok(())
    }
    fn set_button(&mut self, _: MouseButton, _: ButtonState) -> PlatformResult<()> {
        Ok(())
    }
    fn click(&mut self, _: ClickKind) -> PlatformResult<()> {
        Ok(())
    }
    fn screen_size(&mut self) -> PlatformResult<(i32, i32)> {
        Ok((1920, 1080))
    }
    fn position(&mut self) -> PlatformResult<(i32, i32)> {
        Ok(self.position)
    }
}

/// Deltas resembling a hand-held sensor: drift, tremor and steady sweeps
fn generate_deltas(count: usize) -> Vec<(i32, i32)> {
    (0..count)
        .map(|i| match i % 8 {
            0 | 1 => (1, 0),
            2 => (12, -3),
            3 => (-11, 2),
            4 => (15, 4),
            5 => (-14, -4),
            _ => (25, 10),
        })
        .collect()
}

fn bench_filter_depths(c: &mut Criterion) {
    let mut group = c.benchmark_group("stabilizer_history_depth");
    let deltas = generate_deltas(1000);

    for depth in [3usize, 5, 10, 32] {
        group.throughput(Throughput::Elements(deltas.len() as u64));
        group.bench_with_input(BenchmarkId::new("process", depth), &depth, |b, &depth| {
            b.iter(|| {
                let t0 = Instant::now();
                let mut filter = StabilizationFilter::with_start(
                    StabilizationConfig {
                        history_depth: depth,
                        ..Default::default()
                    },
                    t0,
                );
                for (i, &(dx, dy)) in deltas.iter().enumerate() {
                    let now = t0 + Duration::from_millis(16 * (i as u64 + 1));
                    black_box(filter.process(dx, dy, now));
                }
            });
        });
    }

    group.finish();
}

fn bench_stage_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("stabilizer_stages");
    let deltas = generate_deltas(1000);

    let configs = [
        (
            "dead_zone_only",
            StabilizationConfig {
                smoothing_level: 0.0,
                jiggle_filter: false,
                anti_drift: false,
                ..Default::default()
            },
        ),
        ("all_stages", StabilizationConfig::default()),
    ];

    for (name, config) in configs {
        group.throughput(Throughput::Elements(deltas.len() as u64));
        group.bench_function(BenchmarkId::new("process", name), |b| {
            b.iter(|| {
                let t0 = Instant::now();
                let mut filter = StabilizationFilter::with_start(config.clone(), t0);
                for (i, &(dx, dy)) in deltas.iter().enumerate() {
                    let now = t0 + Duration::from_millis(16 * (i as u64 + 1));
                    black_box(filter.process(dx, dy, now));
                }
            });
        });
    }

    group.finish();
}

fn bench_pipeline_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_move");

    group.bench_function("unfiltered", |b| {
        let pointer = NullPointer {
            position: (960, 540),
        };
        let mut pipeline = MotionPipeline::new(
            PlatformCursor::new(pointer),
            MotionConfig {
                silent: true,
                ..Default::default()
            },
            None,
        );
        let mut sign = 1;
        b.iter(|| {
            sign = -sign;
            black_box(pipeline.move_by(5 * sign, 3 * sign)).ok();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_filter_depths,
    bench_stage_cost,
    bench_pipeline_move
);
criterion_main!(benches);
