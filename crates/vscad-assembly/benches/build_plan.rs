//! Build plan and import benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use vscad_assembly::{BuildPlan, ImportOptions, Importer};
use vscad_document::MemoryStore;

/// A balanced tree of `depth` assembly levels with `width` children each.
fn tree(depth: usize, width: usize, prefix: &str) -> Value {
    let children: Vec<Value> = if depth == 0 {
        Vec::new()
    } else {
        (0..width)
            .map(|i| tree(depth - 1, width, &format!("{}-{}", prefix, i)))
            .collect()
    };
    json!({
        "name": "node",
        "uuid": prefix,
        "partName": "Beam",
        "partUuid": "b",
        "posX": 0.01, "posY": 0.0, "posZ": 0.0,
        "rotX": 0.0, "rotY": 0.0, "rotZ": 0.1,
        "children": children
    })
}

fn input(depth: usize, width: usize) -> Value {
    json!({
        "Products": tree(depth, width, "r"),
        "Parts": [{
            "name": "Beam", "uuid": "b", "shape": "BOX",
            "lengthX": 0.04, "lengthY": 0.02, "lengthZ": 0.01,
            "radius": 0.0, "color": 12632256
        }]
    })
}

fn plan_wide(c: &mut Criterion) {
    let value = tree(4, 6, "r");
    c.bench_function("plan_wide", |b| {
        b.iter(|| BuildPlan::from_root(black_box(&value)))
    });
}

fn plan_deep(c: &mut Criterion) {
    let value = tree(12, 2, "r");
    c.bench_function("plan_deep", |b| {
        b.iter(|| BuildPlan::from_root(black_box(&value)))
    });
}

fn import_memory(c: &mut Criterion) {
    let value = input(3, 4);
    c.bench_function("import_memory", |b| {
        b.iter(|| {
            let mut store = MemoryStore::new();
            let options = ImportOptions::new().with_reopen_root(false);
            let summary = Importer::new(&mut store, options).import(black_box(&value));
            summary
        })
    });
}

criterion_group!(benches, plan_wide, plan_deep, import_memory);
criterion_main!(benches);
