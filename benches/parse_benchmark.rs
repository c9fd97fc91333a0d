//! Benchmarks for suffixdb load and lookup performance.
//!
//! Run with: cargo bench
//!
//! This benchmark suite measures:
//! - Lookup throughput per hasher
//! - Locked vs frozen lookups
//! - Load time for synthetic lists of different sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use suffixdb::{AHash64, Database, Fnv1a, SuffixHasher};

const SMALL_LIST: &str = include_str!("../testdata/small.dat");

const HOSTS: &[&str] = &[
    "www.example.com",
    "google.org.ac",
    "a.b.c.d.example.co.uk",
    "foo.bar.ck",
    "www.city.kobe.jp",
    "thing.dyndns.org",
    "verylongverylongverylongverylongverylongverylonghostname.ipa.xyz",
    "unknown.no-tld",
];

/// Generate a list with `count` synthetic rules on top of the small list.
fn generate_list(count: usize) -> String {
    let mut list = String::from(SMALL_LIST);
    list.push_str("// ===BEGIN ICANN DOMAINS===\n");
    for i in 0..count {
        match i % 4 {
            0 => list.push_str(&format!("tld{}\n", i)),
            1 => list.push_str(&format!("co.tld{}\n", i - 1)),
            2 => list.push_str(&format!("*.wild{}.jp\n", i)),
            _ => list.push_str(&format!("!city.wild{}.jp\n", i - 1)),
        }
    }
    list.push_str("// ===END ICANN DOMAINS===\n");
    list
}

fn loaded(hasher: impl SuffixHasher + 'static) -> Database {
    let db = Database::new(hasher);
    db.load_from_str(&generate_list(10_000)).unwrap();
    db
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(HOSTS.len() as u64));

    let fnv = loaded(Fnv1a);
    group.bench_function("fnv1a", |b| {
        b.iter(|| {
            for host in HOSTS {
                black_box(fnv.parse(black_box(host.as_bytes())).unwrap());
            }
        })
    });

    let ahash = loaded(AHash64::new());
    group.bench_function("ahash", |b| {
        b.iter(|| {
            for host in HOSTS {
                black_box(ahash.parse(black_box(host.as_bytes())).unwrap());
            }
        })
    });

    group.bench_function("ahash_reader", |b| {
        let reader = ahash.read().unwrap();
        b.iter(|| {
            for host in HOSTS {
                black_box(reader.parse(black_box(host.as_bytes())));
            }
        })
    });

    let frozen = loaded(AHash64::new()).freeze().unwrap();
    group.bench_function("ahash_frozen", |b| {
        b.iter(|| {
            for host in HOSTS {
                black_box(frozen.parse(black_box(host.as_bytes())));
            }
        })
    });

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.sample_size(20);

    for size in [1_000, 10_000, 50_000] {
        let list = generate_list(size);
        group.throughput(Throughput::Bytes(list.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &list, |b, list| {
            let db = Database::new(AHash64::new());
            b.iter(|| db.reload_from_reader(black_box(list.as_bytes())).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_load);
criterion_main!(benches);
