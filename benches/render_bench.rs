//! Benchmarks for simulation and rasterization.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mandala_viz::particles::ParticleSimulator;
use mandala_viz::render::{FrameRenderer, RenderConfig};
use mandala_viz::themes::Theme;

/// Simulator warmed up with a few bursts so frames carry a realistic load.
fn warmed_simulator(theme: Theme) -> ParticleSimulator {
    let mut sim = ParticleSimulator::with_seed(theme.profile(), 42);
    for frame in 0..20 {
        sim.step(if frame % 4 == 0 { 1.0 } else { 0.0 });
    }
    sim
}

fn bench_simulation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Simulation Step");

    for theme in Theme::all() {
        group.bench_function(BenchmarkId::new("step", theme.name()), |b| {
            let mut sim = warmed_simulator(*theme);
            let mut frame = 0usize;
            b.iter(|| {
                frame += 1;
                black_box(sim.step(if frame % 4 == 0 { 1.0 } else { 0.0 }));
            });
        });
    }

    group.finish();
}

fn bench_render_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("Frame Render");
    group.sample_size(20);

    for theme in Theme::all() {
        let renderer = FrameRenderer::new(RenderConfig::default(), theme.profile());
        let particles = warmed_simulator(*theme).particles().to_vec();

        group.bench_function(BenchmarkId::new("render", theme.name()), |b| {
            b.iter(|| {
                black_box(renderer.render(&particles, 0.8));
            });
        });
    }

    for (width, height) in [(320, 240), (640, 480), (1280, 720)] {
        let config = RenderConfig {
            width,
            height,
            ..RenderConfig::default()
        };
        group.bench_function(
            BenchmarkId::new("background", format!("{}x{}", width, height)),
            |b| {
                b.iter(|| {
                    black_box(FrameRenderer::new(config.clone(), Theme::Agni.profile()));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_simulation_step, bench_render_frame);
criterion_main!(benches);
