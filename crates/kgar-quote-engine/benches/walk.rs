use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kgar_quote_engine::{
    MarkdownView, QuotePreview, Selection, UpdateFlags, ViewUpdate, render_decorations,
    render_reading_view,
};
use relative_path::RelativePath;
use std::hint::black_box;

// A note mixing prose, nested quotes and trigger lines
fn generate_note(size_kb: usize) -> String {
    let base = r#"## Reading notes

Some prose between quotes, long enough to look like a real paragraph of
notes taken while reading.

> $kgar
> The first quote line above becomes a widget.
> > $KGAR
> > Nested quotes get their own widget.

> Plain quote, no trigger here.
> $kgar is not on the first line so it stays.

"#;

    let target_bytes = size_kb * 1024;
    let mut content = String::new();
    let mut section = 0;
    while content.len() < target_bytes {
        content.push_str(&format!("# Section {section}\n\n"));
        content.push_str(base);
        section += 1;
    }
    content
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");
    group.sample_size(20);
    let file = Some(RelativePath::new("bench.md"));

    for height in [40, 400] {
        let mut view = MarkdownView::new(&generate_note(100));
        view.set_viewport_height(height);
        let end = view.len();
        view.set_selection(Selection::cursor(end));

        group.bench_with_input(BenchmarkId::new("viewport_lines", height), &view, |b, view| {
            b.iter(|| black_box(render_decorations(black_box(view), file)));
        });
    }

    let mut view = MarkdownView::new(&generate_note(100));
    let mut preview = QuotePreview::new(&view, file);
    group.bench_function("scroll_and_update", |b| {
        let mut line = 0;
        b.iter(|| {
            line = (line + 7) % view.lines().len();
            let flags = view.scroll_to(line);
            preview.update(&ViewUpdate {
                view: &view,
                active_file: file,
                flags: flags.merge(UpdateFlags {
                    viewport_changed: true,
                    ..UpdateFlags::NONE
                }),
            });
            black_box(preview.decorations().len());
        });
    });

    group.finish();
}

fn bench_reading_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("reading_view");
    group.sample_size(20);

    let content = generate_note(100);
    group.bench_function("render_and_enhance", |b| {
        b.iter(|| black_box(render_reading_view(black_box(&content))));
    });

    group.finish();
}

criterion_group!(benches, bench_walk, bench_reading_view);
criterion_main!(benches);
