use chatwidget_engine::{build_markup, format_reply, parse_markup};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
mod common;

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.sample_size(20);

    for items in [5, 50] {
        let reply = common::generate_reply(items, 3);

        group.bench_with_input(BenchmarkId::new("build_markup", items), &reply, |b, r| {
            b.iter(|| std::hint::black_box(build_markup(std::hint::black_box(r))));
        });

        group.bench_with_input(BenchmarkId::new("format_reply", items), &reply, |b, r| {
            b.iter(|| std::hint::black_box(format_reply(std::hint::black_box(r))));
        });

        let markup = common::generate_markup(items);
        group.bench_with_input(BenchmarkId::new("parse_markup", items), &markup, |b, m| {
            b.iter(|| std::hint::black_box(parse_markup(std::hint::black_box(m))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_formatting);
criterion_main!(benches);
