//! Fixed-width record benchmarks.

use criterion::{Criterion, criterion_group, criterion_main};
use sarmeta_tre::{TreExtension, TreOptions, decode_record, encode_record, parse_extensions};
use std::hint::black_box;

fn benchmark_record_encode(c: &mut Criterion) {
    let layout = sarmeta_records::csccga().expect("Failed to build layout");
    let node = sarmeta_bench::csccga().expect("Failed to build fixture");
    let options = TreOptions::new();

    c.bench_function("csccga_encode", |b| {
        b.iter(|| encode_record(black_box(&node), &layout, &options))
    });
}

fn benchmark_record_decode(c: &mut Criterion) {
    let layout = sarmeta_records::csccga().expect("Failed to build layout");
    let node = sarmeta_bench::csccga().expect("Failed to build fixture");
    let encoded = encode_record(&node, &layout, &TreOptions::new()).expect("Failed to encode");

    c.bench_function("csccga_decode", |b| {
        b.iter(|| decode_record(black_box(&encoded.bytes), &layout))
    });
}

fn benchmark_extension_area(c: &mut Criterion) {
    let layout = sarmeta_records::csccga().expect("Failed to build layout");
    let node = sarmeta_bench::csccga().expect("Failed to build fixture");
    let encoded = encode_record(&node, &layout, &TreOptions::new()).expect("Failed to encode");

    let mut area = Vec::new();
    for _ in 0..16 {
        let extension = TreExtension::new(layout.tag(), encoded.bytes.clone());
        area.extend_from_slice(&extension.to_bytes().expect("Failed to frame"));
    }

    c.bench_function("extension_area_parse", |b| {
        b.iter(|| parse_extensions(black_box(&area)))
    });
}

criterion_group!(
    benches,
    benchmark_record_encode,
    benchmark_record_decode,
    benchmark_extension_area,
);
criterion_main!(benches);
