use criterion::{black_box, criterion_group, criterion_main, Criterion};
use protoforge::varint::{decode_varint, encode_varint, varint_len};

fn bench_varint(c: &mut Criterion) {
    let values: Vec<u64> = (0..64).map(|shift| 1u64 << shift).collect();

    let mut encoded = Vec::new();
    for value in &values {
        encode_varint(*value, &mut encoded);
    }

    c.bench_function("encode_varint", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(encoded.len());
            for value in &values {
                encode_varint(black_box(*value), &mut buf);
            }
            buf
        })
    });

    c.bench_function("decode_varint", |b| {
        b.iter(|| {
            let mut slice = &encoded[..];
            let mut total = 0u64;
            while !slice.is_empty() {
                total = total.wrapping_add(decode_varint(&mut slice).unwrap());
            }
            total
        })
    });

    c.bench_function("varint_len", |b| {
        b.iter(|| values.iter().map(|value| varint_len(black_box(*value))).sum::<usize>())
    });
}

criterion_group!(benches, bench_varint);
criterion_main!(benches);
