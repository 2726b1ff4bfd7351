use alfred::{build_query, impl_record, parse_query_string, Alfred, Executor};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

#[derive(Clone)]
struct Row {
    name: String,
    score: i64,
    ratio: f64,
    tags: Vec<String>,
}

impl_record!(Row { name, score, ratio, tags });

fn rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| Row {
            name: format!("row-{:06}", (i * 7919) % count),
            score: ((i * 31) % 1000) as i64,
            ratio: (i % 100) as f64 / 100.0,
            tags: vec![format!("t{}", i % 10), format!("g{}", i % 3)],
        })
        .collect()
}

const QUERY: &str =
    "filter[name][like]=row-0&filter[score][gte]=250&filter[tags][contain]=g1&sortBy=name&orderBy=desc&limit=50&offset=10";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_query_string", |b| {
        b.iter(|| parse_query_string(black_box(QUERY)))
    });
}

fn bench_execute(c: &mut Criterion) {
    let option = parse_query_string(QUERY);
    let executor = Executor::new();
    let mut group = c.benchmark_group("execute");

    for size in [100, 1_000, 10_000] {
        let input = rows(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| executor.execute(black_box(input.clone()), &option))
        });
    }
    group.finish();
}

fn bench_sort_only(c: &mut Criterion) {
    let alfred = Alfred::new();
    let by_ratio = alfred.parse("sortBy=ratio");
    let by_name = alfred.parse("sortBy=name");
    let input = rows(10_000);

    c.bench_function("sort_float_10k", |b| {
        b.iter(|| alfred.apply(black_box(input.clone()), &by_ratio))
    });
    c.bench_function("sort_text_10k", |b| {
        b.iter(|| alfred.apply(black_box(input.clone()), &by_name))
    });
}

fn bench_build_query(c: &mut Criterion) {
    let option = parse_query_string(QUERY);
    c.bench_function("build_query", |b| {
        b.iter(|| build_query(black_box("SELECT * FROM rows"), &option))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_execute,
    bench_sort_only,
    bench_build_query
);
criterion_main!(benches);
