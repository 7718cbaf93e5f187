//! Performance benchmarks for the property binder
//!
//! These benchmarks measure flattening, key matching and binding over
//! source lists of growing size.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use property_binder::{
    binder::{relaxed, BindOptions, Binder},
    config::flatten::{flatten_yaml, parse_properties},
    models::{ConfigRecord, PropertySource},
};
use std::hint::black_box;

const APPLICATION_YML: &str = r#"
person:
  last-name: Li
  age: 18
  boss: false
  birth: 2017/12/12
  maps: {k1: v1, k2: 12}
  list: [lisi, zhaoliu]
  dog:
    name: Tom
    breed: Husky
"#;

/// A source with `noise` unrelated keys around the person keys
fn create_source(name: &str, noise: usize) -> PropertySource {
    let mut source = PropertySource::from_pairs(
        name,
        [
            ("person.last-name", "Li"),
            ("person.age", "18"),
            ("person.is-owner", "true"),
            ("person.birth-date", "2017-12-12 08:30:00"),
            ("person.pet.name", "Tom"),
        ],
    );
    for i in 0..noise {
        source.insert(format!("server.node{}.port", i), i.to_string());
        source.insert(format!("person.maps.key{}", i), format!("value{}", i));
        source.insert(format!("person.list[{}]", i), format!("item{}", i));
    }
    source
}

fn benchmark_flattening(c: &mut Criterion) {
    let mut group = c.benchmark_group("flattening");

    group.bench_function("flatten_yaml", |b| {
        b.iter(|| flatten_yaml(black_box("application.yml"), black_box(APPLICATION_YML)))
    });

    let properties: String = (0..100)
        .map(|i| format!("person.maps.key{}=value{}\n", i, i))
        .collect();
    group.bench_function("parse_properties_100", |b| {
        b.iter(|| parse_properties(black_box("person.properties"), black_box(&properties)))
    });

    group.finish();
}

fn benchmark_key_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_matching");

    group.bench_function("parse_path", |b| {
        b.iter(|| relaxed::parse_path(black_box("person.maps[some.key].inner[3]")))
    });

    group.bench_function("matches", |b| {
        b.iter(|| relaxed::matches(black_box("lastName"), black_box("LAST_NAME")))
    });

    group.finish();
}

fn benchmark_binding(c: &mut Criterion) {
    let mut group = c.benchmark_group("binding");
    let binder = Binder::new(BindOptions::default());

    for noise in [0usize, 10, 100, 1000] {
        let sources = vec![create_source("low", noise), create_source("high", noise / 2)];
        group.bench_with_input(BenchmarkId::new("bind_record", noise), &sources, |b, sources| {
            b.iter(|| binder.bind::<ConfigRecord>(black_box(sources)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_flattening, benchmark_key_matching, benchmark_binding);

criterion_main!(benches);
