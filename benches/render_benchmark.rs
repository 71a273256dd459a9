use code_explainer::geometry::Frame;
use code_explainer::renderer::{RenderEngine, RenderSettings};
use code_explainer::scene::build;
use code_explainer::style::BLACK;
use code_explainer::AsyncProcessingExplanation;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_build_scene(c: &mut Criterion) {
    c.bench_function("build_async_scene", |b| {
        b.iter(|| build(&mut AsyncProcessingExplanation, black_box(Frame::default())).unwrap())
    });
}

fn bench_render_frame(c: &mut Criterion) {
    let settings = RenderSettings {
        width: 1920,
        height: 1080,
        fps: 60,
        background: BLACK,
    };
    let timeline = build(
        &mut AsyncProcessingExplanation,
        Frame::for_resolution(settings.width, settings.height),
    )
    .unwrap();
    let mut engine = RenderEngine::new(timeline, &settings).unwrap();

    // 35.5s: code block on stage with the first highlight flashing
    c.bench_function("render_frame_1080p", |b| {
        b.iter(|| {
            engine.render_frame(black_box(2130)).unwrap();
        })
    });
}

criterion_group!(benches, bench_build_scene, bench_render_frame);
criterion_main!(benches);
