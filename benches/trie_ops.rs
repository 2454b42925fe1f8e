//! Benchmarks for trie construction, prefix folds and multi-pattern scans.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ptrie::{ByteAcTrie, DigitTrie, MappedByteAcTrie, MappedDigitTrie, StringCodec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_digit_keys(n: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            let len = rng.gen_range(3..=10);
            (0..len).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
        })
        .collect()
}

fn generate_words(n: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|_| {
            let len = rng.gen_range(3..=8);
            (0..len).map(|_| char::from(b'a' + rng.gen_range(0..16))).collect()
        })
        .collect()
}

fn generate_text(len: usize) -> String {
    let mut rng = StdRng::seed_from_u64(99);
    (0..len).map(|_| char::from(b'a' + rng.gen_range(0..16))).collect()
}

fn build_digits(keys: &[String]) -> DigitTrie<String> {
    let mut t = DigitTrie::new();
    for k in keys {
        t.store(k.as_bytes(), k.clone()).unwrap();
    }
    t
}

fn build_ac(words: &[String]) -> ByteAcTrie<String> {
    let mut t = ByteAcTrie::new();
    for w in words {
        t.store(w.as_bytes(), w.clone()).unwrap();
    }
    t.make_links().unwrap();
    t
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    for size in [1_000, 10_000, 100_000] {
        let keys = generate_digit_keys(size);
        group.bench_with_input(BenchmarkId::new("DigitTrie", size), &keys, |b, keys| {
            b.iter(|| black_box(build_digits(keys)));
        });
    }

    group.finish();
}

fn bench_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold");
    let dir = tempfile::tempdir().unwrap();

    for size in [1_000, 100_000] {
        let keys = generate_digit_keys(size);
        let trie = build_digits(&keys);
        let path = dir.path().join(format!("digits-{size}.trie"));
        trie.write_to_file::<u32, _>(&path, &StringCodec).unwrap();
        let mapped: MappedDigitTrie = MappedDigitTrie::open(&path).unwrap();

        group.bench_with_input(BenchmarkId::new("mutable", size), &keys, |b, keys| {
            b.iter(|| {
                let mut hits = 0usize;
                for k in keys {
                    trie.fold(k.as_bytes(), &mut hits, |hits, data, _, _| {
                        *hits += usize::from(!data.is_empty());
                        Ok(true)
                    })
                    .unwrap();
                }
                black_box(hits)
            });
        });

        group.bench_with_input(BenchmarkId::new("mapped", size), &keys, |b, keys| {
            b.iter(|| {
                let mut hits = 0usize;
                for k in keys {
                    mapped
                        .fold(k.as_bytes(), &mut hits, |hits, off, _, _| {
                            *hits += usize::from(*off != 0);
                            Ok(true)
                        })
                        .unwrap();
                }
                black_box(hits)
            });
        });
    }

    group.finish();
}

fn bench_fold_full(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold_full");
    let dir = tempfile::tempdir().unwrap();
    let text = generate_text(64 * 1024);

    for size in [100, 10_000] {
        let words = generate_words(size);
        let trie = build_ac(&words);
        let path = dir.path().join(format!("words-{size}.trie"));
        trie.write_to_file::<u32, _>(&path, &StringCodec).unwrap();
        let mapped: MappedByteAcTrie = MappedByteAcTrie::open(&path).unwrap();

        group.bench_with_input(BenchmarkId::new("mutable", size), &text, |b, text| {
            b.iter(|| {
                let mut hits = 0usize;
                trie.fold_full(text.as_bytes(), &mut hits, |hits, data, _, _| {
                    *hits += usize::from(!data.is_empty());
                    Ok(true)
                })
                .unwrap();
                black_box(hits)
            });
        });

        group.bench_with_input(BenchmarkId::new("mapped", size), &text, |b, text| {
            b.iter(|| {
                let mut hits = 0usize;
                mapped
                    .fold_full(text.as_bytes(), &mut hits, |hits, off, _, _| {
                        *hits += usize::from(*off != 0);
                        Ok(true)
                    })
                    .unwrap();
                black_box(hits)
            });
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let dir = tempfile::tempdir().unwrap();
    let words = generate_words(10_000);
    let trie = build_ac(&words);
    let path = dir.path().join("export.trie");

    group.bench_function("ByteAcTrie/10000", |b| {
        b.iter(|| black_box(trie.write_to_file::<u32, _>(&path, &StringCodec).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_store, bench_fold, bench_fold_full, bench_export);
criterion_main!(benches);
