use criterion::{Criterion, black_box, criterion_group, criterion_main};
use reql::{Term, Value, r};

fn document(i: i64) -> Value {
    Value::object([
        ("id", Value::from(i)),
        ("name", Value::from(format!("user-{i}"))),
        ("tags", Value::array(["a", "b", "c"])),
        ("score", Value::from(i as f64 * 1.5)),
    ])
}

fn build_query() -> Term {
    r::table("events")
        .unwrap()
        .filter(r::func1(|row| row.get_field("score")?.gt([100])).unwrap())
        .unwrap()
        .order_by([r::desc("score").unwrap()])
        .unwrap()
        .limit(50)
        .unwrap()
        .pluck(["id", "name", "score"])
        .unwrap()
}

fn bench_build_chain(c: &mut Criterion) {
    c.bench_function("build_chained_query", |b| b.iter(|| black_box(build_query())));
}

fn bench_lift_batch(c: &mut Criterion) {
    c.bench_function("lift_insert_batch", |b| {
        b.iter(|| {
            let docs: Vec<Value> = (0..1_000).map(document).collect();
            r::table("events").unwrap().insert(black_box(docs)).unwrap()
        })
    });
}

fn bench_serialize(c: &mut Criterion) {
    let docs: Vec<Value> = (0..1_000).map(document).collect();
    let insert = r::table("events").unwrap().insert(docs).unwrap();
    let query = build_query();

    c.bench_function("serialize_chained_query", |b| {
        b.iter(|| black_box(&query).to_wire_bytes().unwrap())
    });
    c.bench_function("serialize_insert_batch", |b| {
        b.iter(|| black_box(&insert).to_wire_bytes().unwrap())
    });
}

criterion_group!(hot_paths, bench_build_chain, bench_lift_batch, bench_serialize);
criterion_main!(hot_paths);
