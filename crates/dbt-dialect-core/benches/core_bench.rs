//! Criterion benchmarks for dbt-dialect-core.
//!
//! Every group runs against a synthetic dbt project written to a temporary
//! directory, so the numbers include real directory walks and file reads.
//!
//! ## Benchmark groups
//!
//! 1. **catalog**: rule matching on a single SQL string.
//! 2. **scan**: dialect scan over projects of increasing size.
//! 3. **resolve**: fuzzy file resolution.
//! 4. **classify**: schema classification over compiled SQL.
//!
//! ## Running
//!
//! ```sh
//! cargo bench --manifest-path crates/dbt-dialect-core/Cargo.toml
//! # Run only the scan group:
//! cargo bench --manifest-path crates/dbt-dialect-core/Cargo.toml -- scan
//! ```

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::TempDir;

use _dbt_dialect_core::dialect::catalog::PatternCatalog;
use _dbt_dialect_core::dialect::scanner::scan;
use _dbt_dialect_core::modeling::classify;
use _dbt_dialect_core::models::Warehouse;
use _dbt_dialect_core::project::resolver::resolve;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SNOWFLAKE_MODEL: &str = "select id, iff(active, 1, 0) as flag, v:payload::variant as body\n\
     from raw.events, lateral flatten(input => tags)\n\
     qualify row_number() over (partition by id order by ts desc) = 1";

const PLAIN_MODEL: &str = "select o.id, c.name from dim_customers c\n\
     join fact_orders o on o.customer_id = c.id";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A project with `files` models spread over a few subdirectories, every
/// third one using Snowflake syntax, plus a mirrored `target/compiled` tree.
fn synthetic_project(files: usize) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for i in 0..files {
        let dir = ["staging", "marts", "intermediate"][i % 3];
        let body = if i % 3 == 0 { SNOWFLAKE_MODEL } else { PLAIN_MODEL };
        let rel = format!("models/{dir}/model_{i:04}.sql");
        write(tmp.path(), &rel, body);
        write(tmp.path(), &format!("target/compiled/proj/{rel}"), body);
    }
    write(tmp.path(), "macros/cents_to_dollars.sql", "({{ col }} / 100)::numeric(16, 2)");
    tmp
}

// ---------------------------------------------------------------------------
// 1. catalog
// ---------------------------------------------------------------------------

fn bench_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");
    let catalog = PatternCatalog::global();
    for warehouse in Warehouse::ALL {
        let pattern = catalog.pattern(warehouse);
        group.bench_function(BenchmarkId::new("matching_labels", warehouse.as_str()), |b| {
            b.iter(|| pattern.matching_labels(black_box(SNOWFLAKE_MODEL)).count())
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. scan
// ---------------------------------------------------------------------------

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for size in [10usize, 100, 500] {
        let project = synthetic_project(size);
        group.bench_with_input(BenchmarkId::new("snowflake", size), &size, |b, _| {
            b.iter(|| scan(black_box(project.path()), "snowflake").unwrap())
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. resolve
// ---------------------------------------------------------------------------

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let project = synthetic_project(500);
    for term in ["cents_to_dollars", "model_01", "marts/", "missing_model"] {
        group.bench_with_input(BenchmarkId::new("term", term), &term, |b, term| {
            b.iter(|| resolve(black_box(project.path()), term))
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 4. classify
// ---------------------------------------------------------------------------

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    for size in [10usize, 100, 500] {
        let project = synthetic_project(size);
        let compiled = project.path().join("target/compiled");
        group.bench_with_input(BenchmarkId::new("compiled", size), &size, |b, _| {
            b.iter(|| classify(black_box(&compiled)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_catalog, bench_scan, bench_resolve, bench_classify);
criterion_main!(benches);
