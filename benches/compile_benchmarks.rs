//! Performance benchmarks for the elgo unit build pipeline.
//!
//! Packages are generated in an arena up front, so only conversion and
//! bytecode generation are measured.
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use bumpalo::Bump;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use elgo::Context;
use elgo::ast::{AssignOp, AstBuilder, BinaryOp, FuncDecl, ScalarKind, TypeKind};
use std::hint::black_box;
use std::sync::Arc;

#[cfg(feature = "profile-with-puffin")]
use std::collections::HashMap;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Print the average time per top-level scope over all recorded frames.
#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    use puffin::Reader;

    let Some(frame_view) = FRAME_VIEW.get() else {
        return;
    };
    let view = frame_view.lock();
    let scope_collection = view.scope_collection();

    let mut timings: HashMap<String, i64> = HashMap::new();
    let mut frames = 0i64;
    for frame in view.recent_frames() {
        frames += 1;
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        for (_thread, stream_info) in unpacked.thread_streams.iter() {
            let Ok(scopes) = Reader::from_start(&stream_info.stream).read_top_scopes() else {
                continue;
            };
            for scope in scopes {
                if let Some(details) = scope_collection.fetch_by_id(&scope.id) {
                    *timings.entry(details.name().to_string()).or_insert(0) +=
                        scope.record.duration_ns;
                }
            }
        }
    }

    println!("\n=== Profiling Summary ({frames} frames) ===");
    let mut entries: Vec<_> = timings.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, ns) in entries {
        let avg = if frames > 0 { ns / frames } else { ns };
        println!(
            "  {:30} {:>10.2?}",
            name,
            std::time::Duration::from_nanos(avg as u64)
        );
    }
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

/// `func main.fN(xs [8]int) int { s := 0; for i := 0; i < 8; i++ { s += xs[i] }; return s }`
fn summing_function<'ast>(b: &AstBuilder<'ast>, name: &str) -> FuncDecl<'ast> {
    let array = TypeKind::Array(ScalarKind::Int, 8);
    let xs = b.var("xs", array);
    let s = b.var("s", TypeKind::Int);
    let i = b.var("i", TypeKind::Int);
    b.func(
        name,
        &[b.param("xs", array)],
        &[TypeKind::Int],
        &[
            b.define(&[b.def("s", TypeKind::Int)], &[b.int(0)]),
            b.for_stmt(
                Some(b.define(&[b.def("i", TypeKind::Int)], &[b.int(0)])),
                Some(b.binary(i, BinaryOp::Less, b.int(8))),
                Some(b.inc(i)),
                &[b.assign_op(
                    &[s],
                    AssignOp::AddAssign,
                    &[b.index(xs, i, TypeKind::Int)],
                )],
            ),
            b.ret(&[s]),
        ],
    )
}

fn package_sizes(c: &mut Criterion) {
    setup_profiler();

    let mut ctx = Context::with_runtime().unwrap();
    ctx.seal();
    let ctx = Arc::new(ctx);

    let mut group = c.benchmark_group("unit/package_sizes");
    for count in [1usize, 10, 100, 1000] {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let funcs: Vec<_> = (0..count)
            .map(|n| summing_function(&b, &format!("main.f{n}")))
            .collect();
        let package = b.package("main", &funcs);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &package, |bench, package| {
            bench.iter(|| {
                let mut unit = ctx.create_unit().unwrap();
                let module = unit.build(black_box(package)).unwrap();
                black_box(module.len());
                end_profiling_frame();
            });
        });
    }
    group.finish();

    print_profiling_stats();
}

criterion_group!(benches, package_sizes);
criterion_main!(benches);
