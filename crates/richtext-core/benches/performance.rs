use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use richtext_core::{Bias, EditableStyledDocument, StyleSpans, StyledDocument};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (richtext-core benchmark line)\n"
        ));
    }
    // Remove the final '\n' to avoid creating an extra trailing empty paragraph.
    out.pop();
    out
}

/// Every line split into three differently styled runs.
fn striped_document(line_count: usize) -> EditableStyledDocument<u8> {
    let mut doc = EditableStyledDocument::with_text(&large_text(line_count), 0);
    let spans: StyleSpans<u8> = (0..line_count)
        .flat_map(|_| [(1u8, 7), (2u8, 30), (3u8, 47)])
        .collect();
    let covered = spans.len().min(doc.len());
    let spans = spans.sub_spans(0, covered).unwrap();
    doc.set_style_spans(0, &spans).unwrap();
    doc
}

fn bench_large_file_open(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("large_file_open/50k_lines", |b| {
        b.iter(|| {
            let doc = StyledDocument::from_text(black_box(&text), 0u8);
            black_box(doc.paragraph_count());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("typing_middle/100_inserts", |b| {
        b.iter_batched(
            || EditableStyledDocument::with_text(&text, 0u8),
            |mut doc| {
                let mut offset = doc.len() / 2;
                for _ in 0..100 {
                    doc.insert_text(offset, "x").unwrap();
                    offset += 1;
                }
                black_box(doc.len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_style_span_query(c: &mut Criterion) {
    let doc = striped_document(50_000);
    let start = doc.len() / 2;

    c.bench_function("style_spans/60_lines", |b| {
        b.iter(|| {
            let spans = doc.style_spans(black_box(start), start + 60 * 84).unwrap();
            black_box(spans.span_count());
        })
    });
}

fn bench_navigator_lookups(c: &mut Criterion) {
    let doc = StyledDocument::from_text(&large_text(50_000), 0u8);
    let len = doc.len();

    c.bench_function("navigator/1000_lookups", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let offset = (i * 7919) % len;
                let pos = doc.offset_to_position(black_box(offset), Bias::Backward).unwrap();
                black_box(doc.position_to_offset(pos));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_large_file_open,
    bench_typing_in_middle,
    bench_style_span_query,
    bench_navigator_lookups
);
criterion_main!(benches);
