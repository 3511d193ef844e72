//! Materialization Benchmarks
//!
//! Benchmarks for first reads (stub creation), cached reads, excluded reads
//! and exclusion matching.
//!
//! Run with: `cargo bench --bench materialize`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::rc::Rc;
use stub_builder::prelude::*;

fn creator() -> StubbedInstanceCreator<Rc<str>> {
    StubbedInstanceCreator::new(|name: &str| Rc::<str>::from(name))
}

fn bench_first_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_read");
    let creator = creator();

    for members in [1usize, 10, 100] {
        let names: Vec<String> = (0..members).map(|i| format!("member_{i}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(members), &names, |bench, names| {
            bench.iter(|| {
                let instance = creator.create_stubbed_instance();
                for name in names {
                    black_box(instance.get(name));
                }
            });
        });
    }

    group.finish();
}

fn bench_cached_read(c: &mut Criterion) {
    let instance = creator().create_stubbed_instance();
    let _ = instance.get("func");

    c.bench_function("cached_read", |bench| {
        bench.iter(|| black_box(instance.get(black_box("func"))));
    });
}

fn bench_excluded_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("excluded_read");
    let instance = creator().create_stubbed_instance();

    for name in ["then", "@@iterator", "__proto__"] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &name, |bench, name| {
            bench.iter(|| black_box(instance.get(black_box(name))));
        });
    }

    group.finish();
}

fn bench_exclusion_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("exclusion_matching");
    let defaults = ExclusionSet::defaults();

    for name in ["then", "poll", "__dunder__", "stubbable_member"] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &name, |bench, name| {
            bench.iter(|| black_box(defaults.matches(black_box(name))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_first_read,
    bench_cached_read,
    bench_excluded_read,
    bench_exclusion_matching
);
criterion_main!(benches);
