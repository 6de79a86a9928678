use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use criterion::measurement::WallTime;
use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion,
};
use ecf::{DynamicRecord, SchemaDescription};

#[derive(Default)]
struct Course {
    name: String,
    items: Vec<String>,
    level: String,
}

ecf::record! {
    Course { name, items, level }
}

#[derive(Default)]
struct Catalog {
    title: String,
    revision: u32,
    tags: Vec<String>,
    rooms: BTreeMap<String, Vec<String>>,
    courses: BTreeMap<String, Course>,
}

ecf::record! {
    Catalog { title, revision, tags, rooms, courses }
}

const SCHEMA: &str = r#"{"fields": [
    {"name": "Title", "type": "string"},
    {"name": "Revision", "type": "u32"},
    {"name": "Tags", "type": "list<string>"},
    {"name": "Rooms", "type": "map<string,list<string>>"},
    {"name": "Courses", "type": "map<string,block>", "attributes": ["Level"]}
]}"#;

fn make_catalog(blocks: usize, items: usize) -> String {
    let mut out = String::from("# generated\nTitle: Catalog\nRevision: 7\nTags:\n");
    for i in 0..items {
        let _ = writeln!(out, "  tag-{i}");
    }
    for b in 0..blocks {
        let _ = writeln!(out, "Rooms: building-{b}");
        for i in 0..items {
            let _ = writeln!(out, "\troom-{i}");
        }
        let _ = writeln!(out, "Courses: course-{b} level=basic");
        for i in 0..items {
            let _ = writeln!(out, "    lesson {i}");
        }
    }
    out
}

fn bench_decode(group: &mut BenchmarkGroup<'_, WallTime>, name: &str, text: &str) {
    group.throughput(criterion::Throughput::Bytes(text.len() as u64));
    group.bench_function(BenchmarkId::new("record", name), |b| {
        b.iter(|| {
            let value: Catalog = ecf::from_str(black_box(text)).unwrap();
            black_box(value);
        });
    });

    let description = SchemaDescription::from_json(SCHEMA).unwrap();
    group.bench_function(BenchmarkId::new("dynamic", name), |b| {
        b.iter(|| {
            let mut record = DynamicRecord::new(&description);
            ecf::decode_str(black_box(text), &mut record).unwrap();
            black_box(record);
        });
    });
}

fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3))
}

fn criterion_benchmark(c: &mut Criterion) {
    let small = make_catalog(4, 8);
    let large = make_catalog(200, 50);

    let mut decode = c.benchmark_group("decode");
    bench_decode(&mut decode, "small_catalog", &small);
    bench_decode(&mut decode, "large_catalog", &large);
    decode.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = criterion_benchmark
}
criterion_main!(benches);
