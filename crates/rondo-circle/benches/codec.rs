//! Codec benchmarks
//!
//! Measures decode and encode throughput on synthetic models of
//! increasing size. Real model files would be used in production
//! benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rondo_circle::options::{BuiltinOptions, Conv2dOptions};
use rondo_circle::{encode, Buffer, Model, Operator, OperatorCode, SubGraph, Tensor, TensorType};

/// Chain of conv operators with per-operator weight buffers.
fn synthetic_model(num_ops: usize, weight_bytes: usize) -> Model {
    let mut tensors = vec![Tensor::new("input", TensorType::Float32, vec![1, 32, 32, 1], 0)];
    let mut operators = Vec::with_capacity(num_ops);
    let mut buffers = vec![Buffer::empty()];

    for i in 0..num_ops {
        buffers.push(Buffer::new(vec![0u8; weight_bytes]));
        tensors.push(Tensor::new(
            format!("w{i}"),
            TensorType::UInt8,
            vec![weight_bytes as i32],
            i as u32 + 1,
        ));
        tensors.push(Tensor::new(
            format!("act{i}"),
            TensorType::Float32,
            vec![1, 32, 32, 1],
            0,
        ));
        let input = if i == 0 { 0 } else { (2 * i) as i32 };
        operators.push(Operator::new(
            0,
            vec![input, (2 * i + 1) as i32],
            vec![(2 * i + 2) as i32],
            BuiltinOptions::Conv2D(Conv2dOptions {
                stride_w: 1,
                stride_h: 1,
                ..Default::default()
            }),
        ));
    }

    let last = (tensors.len() - 1) as i32;
    Model {
        version: 3,
        description: None,
        operator_codes: vec![OperatorCode::builtin(3)],
        subgraphs: vec![SubGraph {
            tensors,
            operators,
            inputs: vec![0],
            outputs: vec![last],
            name: Some("main".to_string()),
        }],
        buffers,
        metadata: Vec::new(),
    }
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (ops, weight, name) in [(16, 1024, "16_ops_1kb"), (64, 4096, "64_ops_4kb"), (256, 16384, "256_ops_16kb")] {
        let model = synthetic_model(ops, weight);
        let size = rondo_circle::encode(&model).unwrap().len() as u64;
        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::from_parameter(name), &model, |b, model| {
            b.iter(|| encode(black_box(model)).unwrap());
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (ops, weight, name) in [(16, 1024, "16_ops_1kb"), (64, 4096, "64_ops_4kb"), (256, 16384, "256_ops_16kb")] {
        let bytes = encode(&synthetic_model(ops, weight)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| rondo_circle::decode(black_box(bytes)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
