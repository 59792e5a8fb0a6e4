//! XML codec benchmarks.

use criterion::{Criterion, criterion_group, criterion_main};
use sarmeta_bench::{color_remap, image_formation};
use sarmeta_records::SICD_NAMESPACE;
use sarmeta_xml::{XmlCodec, XmlOptions};
use std::hint::black_box;

fn codec() -> XmlCodec {
    XmlCodec::new(XmlOptions::new().namespace(SICD_NAMESPACE))
}

fn benchmark_image_formation_serialize(c: &mut Criterion) {
    let node = image_formation(8).expect("Failed to build fixture");
    let codec = codec();

    c.bench_function("image_formation_serialize", |b| {
        b.iter(|| codec.to_xml_string(black_box(&node)))
    });
}

fn benchmark_image_formation_deserialize(c: &mut Criterion) {
    let node = image_formation(8).expect("Failed to build fixture");
    let codec = codec();
    let xml = codec.to_xml_string(&node).expect("Failed to serialize");

    c.bench_function("image_formation_deserialize", |b| {
        b.iter(|| codec.from_xml_str(black_box(&xml), node.schema()))
    });
}

fn benchmark_lookup_table(c: &mut Criterion) {
    let node = color_remap(256).expect("Failed to build fixture");
    let codec = codec();
    let xml = codec.to_xml_string(&node).expect("Failed to serialize");

    c.bench_function("color_lut_serialize", |b| {
        b.iter(|| codec.to_xml_string(black_box(&node)))
    });

    c.bench_function("color_lut_deserialize", |b| {
        b.iter(|| codec.from_xml_str(black_box(&xml), node.schema()))
    });
}

fn benchmark_validate(c: &mut Criterion) {
    let node = image_formation(8).expect("Failed to build fixture");

    c.bench_function("image_formation_validate", |b| {
        b.iter(|| black_box(&node).validate())
    });
}

criterion_group!(
    benches,
    benchmark_image_formation_serialize,
    benchmark_image_formation_deserialize,
    benchmark_lookup_table,
    benchmark_validate,
);
criterion_main!(benches);
