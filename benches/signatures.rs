//! Benchmarks for signature parsing and matching.
//!
//! Covers every textual encoding of a member:
//! - Compiler log internal form
//! - Disassembly header
//! - Bytecode listing header, with class generics
//! - Reflection string
//! - Matching against a class of candidates

extern crate jitscope;

use criterion::{criterion_group, criterion_main, Criterion};
use jitscope::signature::{
    types::parse_generic_declaration, FlatHierarchy, GenericsMap, MemberMatcher,
    MemberSignatureParts,
};
use std::hint::black_box;

/// Benchmark the compiler log form with object parameters.
/// Signature: demo/Calc join (Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/String;
fn bench_log_signature(c: &mut Criterion) {
    c.bench_function("sig_log", |b| {
        b.iter(|| {
            let sig = MemberSignatureParts::from_log_signature(black_box(
                "demo/Calc join (Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/String;",
            ))
            .unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark the disassembly header form.
fn bench_assembly_header(c: &mut Criterion) {
    c.bench_function("sig_assembly_header", |b| {
        b.iter(|| {
            let sig = MemberSignatureParts::from_assembly_header(black_box(
                "  # {method} {0x00007f0a0c4a1e30} 'hashCode' '()I' in 'java/lang/String'",
            ))
            .unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark a generic bytecode header.
/// Signature: public <K extends java.lang.Comparable<K>> K max(java.util.List<? extends K>, T...);
fn bench_bytecode_signature_generic(c: &mut Criterion) {
    let mut class_generics = GenericsMap::new();
    class_generics.insert("T".to_string(), "java.lang.Number".to_string());

    c.bench_function("sig_bytecode_generic", |b| {
        b.iter(|| {
            let sig = MemberSignatureParts::from_bytecode_signature(
                "demo.Box",
                black_box("public <K extends java.lang.Comparable<K>> K max(java.util.List<? extends K>, T...);"),
                &class_generics,
            )
            .unwrap();
            black_box(sig.canonical())
        });
    });
}

/// Benchmark the reflection form with a throws clause.
fn bench_reflection(c: &mut Criterion) {
    c.bench_function("sig_reflection", |b| {
        b.iter(|| {
            let sig = MemberSignatureParts::from_reflection(black_box(
                "public static int demo.Calc.parse(java.lang.String) throws java.io.IOException",
            ))
            .unwrap();
            black_box(sig)
        });
    });
}

/// Benchmark a formal type parameter list.
fn bench_generic_declaration(c: &mut Criterion) {
    c.bench_function("sig_generic_declaration", |b| {
        b.iter(|| black_box(parse_generic_declaration(black_box("<K extends java.lang.Comparable<K>, V>"))));
    });
}

/// Benchmark finding a member among a class worth of candidates.
fn bench_matcher(c: &mut Criterion) {
    let declared: Vec<MemberSignatureParts> = (0..32)
        .map(|i| {
            MemberSignatureParts::from_reflection(&format!(
                "public int demo.Calc.op{}(int,java.lang.String)",
                i
            ))
            .unwrap()
        })
        .collect();
    let wanted =
        MemberSignatureParts::from_log_signature("demo/Calc op31 (ILjava/lang/String;)I").unwrap();
    let matcher = MemberMatcher::new(&FlatHierarchy);

    c.bench_function("sig_match", |b| {
        b.iter(|| black_box(matcher.find_match(black_box(&declared), black_box(&wanted))));
    });
}

criterion_group!(
    benches,
    bench_log_signature,
    bench_assembly_header,
    bench_bytecode_signature_generic,
    bench_reflection,
    bench_generic_declaration,
    bench_matcher,
);
criterion_main!(benches);
