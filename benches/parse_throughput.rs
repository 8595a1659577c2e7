//! Criterion measurements of template parsing and binding. Templates come from a seeded
//! generator so runs are comparable across machines and commits.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sql_template::{Binder, TemplateCache, parse};
use std::hint::black_box;
use std::sync::LazyLock;

const SEARCH_NAMED: &str = include_str!("../tests/sql/search-recruiting-name.sql");

/// Generated query-sized templates plus the total byte count for throughput reporting.
struct Workload {
    templates: Vec<String>,
    bytes: u64,
}

static WORKLOAD: LazyLock<Workload> = LazyLock::new(|| {
    let count = template_count();
    let mut rng = ChaCha8Rng::seed_from_u64(1_234_567_890);
    let templates: Vec<String> = (0..count).map(|_| generate_template(&mut rng)).collect();
    let bytes = templates.iter().map(|t| t.len() as u64).sum();
    Workload { templates, bytes }
});

fn template_count() -> usize {
    std::env::var("BENCH_TEMPLATES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100)
}

/// A SELECT with a few hundred bytes of predicates, literals and mixed placeholders.
fn generate_template(rng: &mut ChaCha8Rng) -> String {
    let mut sql = String::with_capacity(512);
    sql.push_str("SELECT c.id, c.name, c.tags, c.category\nFROM campaign c\nWHERE 1 = 1");
    for i in 0..rng.gen_range(6..12) {
        match rng.gen_range(0..4) {
            0 => sql.push_str(&format!("\n  AND c.col_{i} < ?")),
            1 => sql.push_str(&format!("\n  AND c.col_{i} = :param_{}", i % 3)),
            2 => sql.push_str(&format!("\n  AND c.note_{i} <> 'it''s :not_{i} ?'")),
            _ => sql.push_str(&format!("\n  AND c.ts_{i}::date > :since")),
        }
    }
    sql.push_str("\nORDER BY c.id\nLIMIT :limit OFFSET :offset\n");
    sql
}

fn parse_templates(c: &mut Criterion) {
    let workload = &*WORKLOAD;
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(workload.bytes));

    group.bench_function(
        BenchmarkId::new("generated", workload.templates.len()),
        |b| {
            b.iter(|| {
                for sql in &workload.templates {
                    black_box(parse(black_box(sql)));
                }
            });
        },
    );

    group.finish();
}

fn bind_search_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_and_resolve", |b| {
        b.iter(|| {
            let params = Binder::parse(black_box(SEARCH_NAMED))
                .set("now", 1)
                .set("limit", 10)
                .set("offset", 100)
                .resolve()
                .expect("resolve");
            black_box(params);
        });
    });

    let cache = TemplateCache::default();
    group.bench_function("cached_resolve", |b| {
        b.iter(|| {
            let params = cache
                .binder(black_box(SEARCH_NAMED))
                .expect("cached template")
                .set("now", 1)
                .set("limit", 10)
                .set("offset", 100)
                .resolve()
                .expect("resolve");
            black_box(params);
        });
    });

    group.finish();
}

criterion_group!(benches, parse_templates, bind_search_template);
criterion_main!(benches);
