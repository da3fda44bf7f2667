use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dom::{Caret, NodeId};
use selection::{EngineProfile, Page};
use shadow_select::{SelectionResolver, resolve_range};

const SHORT_TEXT: usize = 16;
const LONG_TEXT: usize = 2_048;

fn shadow_fixture(chars: usize) -> (Page, NodeId, NodeId) {
    let mut page = Page::new(EngineProfile::safari());
    let host = page.create_element("x-host");
    page.append_child(NodeId::DOCUMENT, host).unwrap();
    let root = page.attach_shadow(host).unwrap();
    let mut data = "lorem ipsum dolor sit amet ".repeat(chars / 27 + 1);
    data.truncate(chars);
    let text = page.create_text(&data);
    page.append_child(root, text).unwrap();
    (page, root, text)
}

fn bench_resolve_short_range(c: &mut Criterion) {
    let (mut page, root, text) = shadow_fixture(SHORT_TEXT);
    c.bench_function("bench_resolve_short_range", |b| {
        b.iter(|| {
            page.set_base_and_extent(Caret::new(text, 2), Caret::new(text, 9));
            let resolved = resolve_range(black_box(&mut page), root, None).unwrap();
            black_box(resolved);
        });
    });
}

fn bench_resolve_long_range_near_start(c: &mut Criterion) {
    let (mut page, root, text) = shadow_fixture(LONG_TEXT);
    c.bench_function("bench_resolve_long_range_near_start", |b| {
        b.iter(|| {
            page.set_base_and_extent(Caret::new(text, 10), Caret::new(text, 20));
            let resolved = resolve_range(black_box(&mut page), root, None).unwrap();
            black_box(resolved);
        });
    });
}

fn bench_resolve_caret_long_text(c: &mut Criterion) {
    let (mut page, root, text) = shadow_fixture(LONG_TEXT);
    c.bench_function("bench_resolve_caret_long_text", |b| {
        b.iter(|| {
            page.set_position(Caret::new(text, LONG_TEXT / 2));
            let resolved = resolve_range(black_box(&mut page), root, None).unwrap();
            black_box(resolved);
        });
    });
}

fn bench_cached_read(c: &mut Criterion) {
    let (mut page, root, text) = shadow_fixture(LONG_TEXT);
    let mut resolver = SelectionResolver::new(page.profile());
    page.set_base_and_extent(Caret::new(text, 10), Caret::new(text, 20));
    c.bench_function("bench_cached_read", |b| {
        b.iter(|| {
            let range = resolver.get_range(&mut page, root).unwrap();
            black_box(range);
        });
    });
}

criterion_group!(
    benches,
    bench_resolve_short_range,
    bench_resolve_long_range_near_start,
    bench_resolve_caret_long_text,
    bench_cached_read
);
criterion_main!(benches);
