use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use searchdoc::{
    Clause, Codec, DateParams, Document, Field, FuzzyParams, MatchPhraseParams, RangeParams,
    ScaledFloatParams, TextParams,
};

fn mapping(n: usize) -> Document<Field> {
    let mut mapping = Document::new();
    for i in 0..n {
        mapping
            .add_params(format!("created_{}", i), DateParams { format: "yyyy-MM-dd".into(), store: true.into(), ..Default::default() })
            .unwrap();
        mapping
            .add_params(format!("price_{}", i), ScaledFloatParams { scaling_factor: 100.into(), ..Default::default() })
            .unwrap();
        mapping
            .add_params(format!("title_{}", i), TextParams { norms: false.into(), analyzer: "english".into(), ..Default::default() })
            .unwrap();
    }
    mapping
}

fn query(n: usize) -> Document<Clause> {
    let mut query = Document::new();
    for i in 0..n {
        query
            .add_params(format!("age_{}", i), RangeParams { greater_than_or_equal_to: 18.into(), less_than: "2021-06-01".into(), ..Default::default() })
            .unwrap();
        query
            .add_params(format!("body_{}", i), MatchPhraseParams { query: "quick brown fox".into(), ..Default::default() })
            .unwrap();
        query
            .add_params(format!("user_{}", i), FuzzyParams { value: "ki".into(), fuzziness: "AUTO".into(), ..Default::default() })
            .unwrap();
    }
    query
}

pub fn criterion_benchmark(c: &mut Criterion) {
    for (label, codec) in [("json", Codec::json()), ("binary", Codec::binary())] {
        let m = mapping(100);
        c.bench_function(&format!("encode mapping 300 {}", label), |b| {
            b.iter(|| codec.encode_document(black_box(&m)).unwrap())
        });
        let bytes = codec.encode_document(&m).unwrap();
        c.bench_function(&format!("decode mapping 300 {}", label), |b| {
            b.iter(|| codec.decode_document::<Field>(black_box(&bytes)).unwrap())
        });

        let q = query(100);
        c.bench_function(&format!("encode query 300 {}", label), |b| {
            b.iter(|| codec.encode_document(black_box(&q)).unwrap())
        });
        let bytes = codec.encode_document(&q).unwrap();
        c.bench_function(&format!("decode query 300 {}", label), |b| {
            b.iter(|| codec.decode_document::<Clause>(black_box(&bytes)).unwrap())
        });
    }
    c.bench_function("build 300 fields", |b| b.iter(|| mapping(black_box(100))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
