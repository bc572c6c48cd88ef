//! Semantic Analyzer Performance Benchmarks
//!
//! - Signature registration and body checking throughput
//! - Alias resolution depth
//! - Scope lookups under deep shadowing
//! - Call validation, clean and with findings

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gocheck_benchmarks::{alias_chain, deep_scopes, many_calls, many_locals, many_signatures, nested_calls};
use gocheck_sema::{Analyzer, AnalyzerConfig};

// ============================================================================
// Declarations
// ============================================================================

fn bench_signatures(c: &mut Criterion) {
    let mut group = c.benchmark_group("signatures");
    let analyzer = Analyzer::default();

    for count in [10, 100, 1000] {
        let program = many_signatures(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("analyze", count), &program, |b, program| {
            b.iter(|| black_box(analyzer.analyze(black_box(program))))
        });
    }

    group.finish();
}

fn bench_alias_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("alias_chain");
    let analyzer = Analyzer::default();

    for depth in [4, 16, 60] {
        let program = alias_chain(depth);
        group.bench_with_input(BenchmarkId::new("analyze", depth), &program, |b, program| {
            b.iter(|| black_box(analyzer.analyze(black_box(program))))
        });
    }

    group.finish();
}

// ============================================================================
// Scopes
// ============================================================================

fn bench_scopes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scopes");
    let analyzer = Analyzer::default();

    for count in [100, 1000] {
        let program = many_locals(count);
        group.bench_with_input(BenchmarkId::new("many_locals", count), &program, |b, program| {
            b.iter(|| black_box(analyzer.analyze(black_box(program))))
        });
    }

    for depth in [10, 100] {
        let program = deep_scopes(depth);
        group.bench_with_input(BenchmarkId::new("deep_shadowing", depth), &program, |b, program| {
            b.iter(|| black_box(analyzer.analyze(black_box(program))))
        });
    }

    group.finish();
}

// ============================================================================
// Calls
// ============================================================================

fn bench_calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("calls");
    let strict = Analyzer::default();
    let widening = Analyzer::new(AnalyzerConfig::default().with_numeric_literal_widening(true));

    for count in [100, 1000] {
        let program = many_calls(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("strict", count), &program, |b, program| {
            b.iter(|| black_box(strict.analyze(black_box(program))))
        });
        group.bench_with_input(BenchmarkId::new("widening", count), &program, |b, program| {
            b.iter(|| black_box(widening.analyze(black_box(program))))
        });
    }

    let program = nested_calls(50);
    group.bench_function("nested_50", |b| b.iter(|| black_box(strict.analyze(black_box(&program)))));

    group.finish();
}

criterion_group!(benches, bench_signatures, bench_alias_chain, bench_scopes, bench_calls);
criterion_main!(benches);
