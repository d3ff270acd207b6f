use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use tomlutil::{convert, from_str, parse::parse, to_debug_json, to_string};

#[derive(Serialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Clone)]
struct Catalog {
    title: String,
    products: Vec<Product>,
}

fn catalog(size: usize) -> Catalog {
    Catalog {
        title: "bench".to_string(),
        products: (0..size)
            .map(|i| Product {
                sku: format!("SKU-{:05}", i),
                name: format!("Product {}", i),
                price: 9.99 + i as f64,
                quantity: i as u32,
            })
            .collect(),
    }
}

fn document(size: usize) -> String {
    let mut text = String::from("title = \"bench\"\n");
    for i in 0..size {
        text.push_str(&format!(
            "\n[section_{i}]\nname = \"item {i}\"\nenabled = true\nweights = [1, 2.5, 3]\n\
             created = 1979-05-27T07:32:00.{i:03}-08:00\n\n[section_{i}.nested.deeper]\nvalue = {i}\n"
        ));
    }
    text
}

fn benchmark_parse_and_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_str");
    for size in [10, 100, 1000] {
        let text = document(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_convert_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    for size in [10, 100, 1000] {
        let root = parse(&document(size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &root, |b, root| {
            b.iter(|| convert(black_box(root)))
        });
    }
    group.finish();
}

fn benchmark_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_string");
    for size in [10, 100, 1000] {
        let data = catalog(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| to_string(black_box(data)))
        });
    }
    group.finish();
}

fn benchmark_debug_json(c: &mut Criterion) {
    let text = document(100);
    c.bench_function("to_debug_json_100", |b| {
        b.iter(|| to_debug_json(black_box(&text)))
    });
}

criterion_group!(
    benches,
    benchmark_parse_and_convert,
    benchmark_convert_only,
    benchmark_serialize,
    benchmark_debug_json
);
criterion_main!(benches);
