// ABOUTME: Benchmarks for query building and ACF code generation over synthetic registries
// ABOUTME: Measures fragment construction, per-block compilation and full bundle assembly

use blockgen_sdk::{
    ArtifactBundle, AttributeSpec, BlockDescriptor, CodegenOptions, FieldType, QueryTemplate,
    TemplateRegistry,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use indexmap::IndexMap;
use std::hint::black_box;

const FIELD_TYPES: [FieldType; 6] = [
    FieldType::Text,
    FieldType::Gallery,
    FieldType::Image,
    FieldType::Boolean,
    FieldType::Richtext,
    FieldType::Link,
];

// Type names need exactly two uppercase letters, so the index is spelled in lowercase letters
fn type_name(index: usize) -> String {
    let suffix: String = index
        .to_string()
        .chars()
        .map(|c| (b'a' + c.to_digit(10).unwrap_or(0) as u8) as char)
        .collect();
    format!("AcfBlock{}", suffix)
}

fn registry(blocks: usize, attributes: usize) -> TemplateRegistry {
    let descriptors = (0..blocks)
        .map(|i| {
            let mut attrs = IndexMap::new();
            for a in 0..attributes {
                attrs.insert(
                    format!("field-{}", a),
                    AttributeSpec::builder()
                        .source_type("string")
                        .field_type(FIELD_TYPES[a % FIELD_TYPES.len()])
                        .field_name(format!("block{}_field{}", i, a))
                        .build(),
                );
            }
            BlockDescriptor::builder()
                .block_name(format!("block-{}", i))
                .display_name(format!("Block {}", i))
                .description("Generated block used for benchmarking")
                .icon("admin-generic")
                .keywords(vec!["bench".to_string()])
                .gql_type_name(type_name(i))
                .attributes(attrs)
                .build()
        })
        .collect();

    TemplateRegistry::new(descriptors).expect("Synthetic registry should be valid")
}

fn benchmark_query_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let template = QueryTemplate::default();

    for size in [1, 10, 100] {
        let registry = registry(size, 4);
        group.bench_with_input(BenchmarkId::new("full_query", size), &registry, |b, r| {
            b.iter(|| template.full_query(black_box(r)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("codegen");
    let options = CodegenOptions::default();

    for size in [1, 10, 100] {
        let registry = registry(size, 6);
        group.bench_with_input(BenchmarkId::new("bundle", size), &registry, |b, r| {
            b.iter(|| ArtifactBundle::compile(black_box(r), &options))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_query_building, benchmark_compilation);
criterion_main!(benches);
