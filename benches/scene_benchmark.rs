use criterion::{black_box, criterion_group, criterion_main, Criterion};
use theorem_lantern::config::RendererConfig;
use theorem_lantern::content::{Category, ContentRecord};
use theorem_lantern::renderer::ManimRenderer;
use theorem_lantern::templates::SceneTemplates;

fn bench_template_build(c: &mut Criterion) {
    let content = ContentRecord::sample(Category::Calculus);

    c.bench_function("template_build", |b| {
        b.iter(|| SceneTemplates::build(black_box(&content)))
    });
}

fn bench_script_generation(c: &mut Criterion) {
    let content = ContentRecord::sample(Category::Algebra);
    let scene = SceneTemplates::build(&content);
    let renderer = ManimRenderer::new(scene, &RendererConfig::default());

    c.bench_function("python_script_generation", |b| {
        b.iter(|| black_box(renderer.generate_python_script()))
    });
}

criterion_group!(benches, bench_template_build, bench_script_generation);
criterion_main!(benches);
