use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_yaml::{Mapping, Value};
use yacman::codec::{dump, load_str};
use yacman::deep_merge;
use yacman::expand::{expand_mapping, expand_str};

fn sample_document(entries: usize) -> String {
    let mut text = String::new();
    for i in 0..entries {
        text.push_str(&format!(
            "genome{i}:\n  path: $HOME/genomes/g{i}\n  size: {i}\n  tags: [a, b]\n"
        ));
    }
    text
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for entries in [10, 100, 1000] {
        let text = sample_document(entries);
        group.bench_with_input(BenchmarkId::new("load_str", entries), &text, |b, text| {
            b.iter(|| load_str(black_box(text)));
        });

        let data = load_str(&text).unwrap();
        group.bench_with_input(BenchmarkId::new("dump", entries), &data, |b, data| {
            b.iter(|| dump(black_box(data)));
        });
    }

    group.finish();
}

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand");

    group.bench_function("tilde", |b| {
        b.iter(|| expand_str(black_box("~/project/conf.yaml")));
    });

    group.bench_function("env_var", |b| {
        b.iter(|| expand_str(black_box("$HOME/project/${USER}/conf.yaml")));
    });

    let data = load_str(&sample_document(100)).unwrap();
    group.bench_function("mapping_100", |b| {
        b.iter(|| expand_mapping(black_box(&data)));
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_merge");

    let base = load_str(&sample_document(100)).unwrap();
    let mut overlay = Mapping::new();
    for i in (0..100).step_by(10) {
        let mut inner = Mapping::new();
        inner.insert("size".into(), Value::from(i * 2));
        overlay.insert(format!("genome{i}").into(), Value::Mapping(inner));
    }

    group.bench_function("sparse_overlay", |b| {
        b.iter(|| {
            let mut merged = base.clone();
            deep_merge(&mut merged, black_box(overlay.clone()));
            merged
        });
    });

    group.finish();
}

criterion_group!(benches, bench_codec, bench_expand, bench_merge);
criterion_main!(benches);
