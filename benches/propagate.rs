//! Dictionary propagation benchmarks
//!
//! Run with: cargo bench --bench propagate
//! (add `--features parallel` to measure the rayon path)

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mrfdict::engine::{OffResonanceTerms, RelaxationTerms, RfPulseMatrix};
use mrfdict::{
    MaterialKind, MaterialSource, MaterialTuple, ParameterSpace, SequenceKind, SequenceSchedule,
    SequenceSource, build_dictionary,
};

fn tissues(count: usize) -> Vec<MaterialTuple> {
    (0..count)
        .map(|i| {
            let t1 = 200.0 + 10.0 * i as f64;
            MaterialTuple::new(t1, t1 / 10.0, 0.001 * (i % 50) as f64)
        })
        .collect()
}

fn truncated(schedule: &SequenceSchedule, blocks: usize) -> SequenceSchedule {
    SequenceSchedule::new(schedule.iter().take(blocks).copied().collect()).unwrap()
}

fn bench_terms(c: &mut Criterion) {
    let mut group = c.benchmark_group("terms");
    let tissues = tissues(10_000);
    group.throughput(Throughput::Elements(tissues.len() as u64));

    group.bench_function("relaxation", |b| {
        b.iter(|| RelaxationTerms::compute(black_box(6.0), &tissues).unwrap())
    });
    group.bench_function("off_resonance", |b| {
        b.iter(|| OffResonanceTerms::compute(black_box(6.0), &tissues))
    });

    let mut state = vec![[0.0, 0.0, 1.0]; tissues.len()];
    let rf = RfPulseMatrix::new(30.0, 90.0);
    group.bench_function("rf_rotate", |b| b.iter(|| rf.rotate(black_box(&mut state))));

    group.finish();
}

fn bench_dictionary(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary");
    group.sample_size(10);

    let schedule = truncated(&SequenceKind::Bssfp.schedule(0).unwrap(), 100);
    for count in [100, 1_000, 10_000] {
        let space = ParameterSpace::new(tissues(count)).unwrap();
        group.throughput(Throughput::Elements((count * schedule.len()) as u64));
        group.bench_with_input(BenchmarkId::new("bssfp_100_blocks", count), &space, |b, space| {
            b.iter(|| build_dictionary(space, &schedule).unwrap())
        });
    }

    let space = MaterialKind::Default.parameter_space().unwrap();
    let schedule = SequenceKind::Fisp.schedule(0).unwrap();
    group.bench_function("default_materials_fisp_schedule", |b| {
        b.iter(|| build_dictionary(&space, &schedule).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_terms, bench_dictionary);
criterion_main!(benches);
