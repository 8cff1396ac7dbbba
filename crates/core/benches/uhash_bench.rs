//! Benchmarks for the keyed engine

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use uhash_core::{EngineFlags, Profile, SharedState, Vm, commitment};

fn shared(profile: Profile) -> Arc<SharedState> {
    let mut state = SharedState::allocate(EngineFlags::default().with_profile(profile))
        .expect("shared state allocation");
    state.initialize(&0u32.to_le_bytes(), num_threads());
    Arc::new(state)
}

fn num_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn bench_hash(c: &mut Criterion) {
    let input = b"benchmark input data for the keyed UniversalHash engine";

    for profile in [Profile::Light, Profile::Full] {
        let mut vm = Vm::new(shared(profile));
        let name = match profile {
            Profile::Light => "hash_light",
            Profile::Full => "hash_full",
        };
        c.bench_function(name, |b| b.iter(|| vm.hash(black_box(input))));
    }
}

fn bench_pipelined(c: &mut Criterion) {
    let mut vm = Vm::new(shared(Profile::Light));

    c.bench_function("hash_next", |b| {
        let mut nonce: u32 = 0;
        vm.hash_first(&nonce.to_le_bytes());
        b.iter(|| {
            nonce = nonce.wrapping_add(1);
            vm.hash_next(black_box(&nonce.to_le_bytes()))
        })
    });
}

fn bench_commitment(c: &mut Criterion) {
    let hash = [0x5Au8; 32];
    c.bench_function("commitment", |b| {
        b.iter(|| commitment(black_box(b"block template"), black_box(&hash)))
    });
}

fn bench_init(c: &mut Criterion) {
    let mut group = c.benchmark_group("dataset_init");
    group.sample_size(10);
    group.bench_function("full", |b| b.iter(|| shared(Profile::Full)));
    group.finish();
}

criterion_group!(benches, bench_hash, bench_pipelined, bench_commitment, bench_init);
criterion_main!(benches);
