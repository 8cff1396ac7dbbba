//! Tests for the keyed engine

use std::sync::Arc;

use crate::{AllocError, CpuFeatures, EngineFlags, InitKernel, Profile, SharedState, Vm, commitment};

fn light_state(seed: u32) -> Arc<SharedState> {
    let mut state = SharedState::allocate(EngineFlags::default()).expect("light allocation");
    state.initialize(&seed.to_le_bytes(), 1);
    Arc::new(state)
}

fn full_state(seed: u32, init_threads: usize) -> Arc<SharedState> {
    let flags = EngineFlags::default().with_profile(Profile::Full);
    let mut state = SharedState::allocate(flags).expect("full allocation");
    state.initialize(&seed.to_le_bytes(), init_threads);
    Arc::new(state)
}

#[test]
fn test_basic_hash() {
    let mut vm = Vm::new(light_state(0));
    let result = vm.hash(b"test input data");

    assert_eq!(result.len(), 32);
    assert_eq!(vm.hash(b"test input data"), result);
}

#[test]
fn test_different_inputs_produce_different_hashes() {
    let mut vm = Vm::new(light_state(0));

    assert_ne!(vm.hash(b"input 1"), vm.hash(b"input 2"));
}

#[test]
fn test_seed_changes_hash() {
    let mut vm0 = Vm::new(light_state(0));
    let mut vm1 = Vm::new(light_state(1));

    assert_ne!(vm0.hash(b"same input"), vm1.hash(b"same input"));
}

#[test]
fn test_avalanche_effect() {
    let mut vm = Vm::new(light_state(0));
    let input1 = b"test input";
    let mut input2 = input1.to_vec();
    input2[0] ^= 1;

    let hash1 = vm.hash(input1);
    let hash2 = vm.hash(&input2);

    let diff_bits: u32 = hash1
        .iter()
        .zip(hash2.iter())
        .map(|(a, b)| (a ^ b).count_ones())
        .sum();

    // Expect roughly 128 of 256 bits to differ
    assert!(
        (90..=166).contains(&diff_bits),
        "Avalanche effect: {} bits differ (expected ~128)",
        diff_bits
    );
}

#[test]
fn test_vms_sharing_state_agree() {
    let state = light_state(7);
    let mut a = Vm::new(Arc::clone(&state));
    let mut b = Vm::new(state);

    // Scratchpad contents from an earlier hash must not leak into the next one
    let _ = a.hash(b"warm up");
    assert_eq!(a.hash(b"payload"), b.hash(b"payload"));
}

#[test]
fn test_light_and_full_profiles_agree() {
    let light = light_state(42);
    let full = full_state(42, 2);
    assert!(!light.has_dataset());
    assert!(full.has_dataset());

    for index in [0u64, 1, 777, crate::DATASET_ITEMS as u64 - 1] {
        assert_eq!(light.dataset_item(index), full.dataset_item(index));
    }

    let mut light_vm = Vm::new(light);
    let mut full_vm = Vm::new(full);
    assert_eq!(light_vm.hash(b"template"), full_vm.hash(b"template"));
}

#[test]
fn test_init_thread_count_does_not_change_dataset() {
    let one = full_state(3, 1);
    let four = full_state(3, 4);

    for index in [0u64, 4095, 65535] {
        assert_eq!(one.dataset_item(index), four.dataset_item(index));
    }
}

#[test]
fn test_pipelined_matches_single_shot() {
    let state = light_state(0);
    let mut single = Vm::new(Arc::clone(&state));
    let mut pipelined = Vm::new(state);

    let inputs: [&[u8]; 3] = [b"first", b"second", b"third"];

    pipelined.hash_first(inputs[0]);
    assert!(pipelined.has_pending());
    assert_eq!(pipelined.hash_next(inputs[1]), single.hash(inputs[0]));
    assert_eq!(pipelined.hash_next(inputs[2]), single.hash(inputs[1]));
    assert_eq!(pipelined.hash_last(), Some(single.hash(inputs[2])));

    assert!(!pipelined.has_pending());
    assert_eq!(pipelined.hash_last(), None);
}

#[test]
fn test_hash_next_without_first() {
    let state = light_state(0);
    let mut single = Vm::new(Arc::clone(&state));
    let mut pipelined = Vm::new(state);

    assert_eq!(pipelined.hash_next(b"lonely"), single.hash(b"lonely"));
    assert_eq!(pipelined.hash_last(), Some(single.hash(b"lonely")));
}

#[test]
fn test_commitment_binds_input_and_hash() {
    let mut vm = Vm::new(light_state(0));
    let hash = vm.hash(b"input");

    let c = commitment(b"input", &hash);
    assert_ne!(c, hash);
    assert_eq!(c, commitment(b"input", &hash));
    assert_ne!(c, commitment(b"other", &hash));

    let mut flipped = hash;
    flipped[31] ^= 0x80;
    assert_ne!(c, commitment(b"input", &flipped));
}

#[test]
fn test_flags() {
    let flags = EngineFlags {
        jit: true,
        large_pages: true,
        ..EngineFlags::default()
    };
    let full = flags.with_profile(Profile::Full);
    assert_eq!(full.profile, Profile::Full);
    assert!(full.jit && full.large_pages);

    // Advisory flags still allocate
    let state = SharedState::allocate(full).expect("allocation with advisory flags");
    assert_eq!(state.flags(), full);
}

#[test]
fn test_cpu_feature_application() {
    let mut flags = EngineFlags::default();
    flags.apply_cpu_features(CpuFeatures {
        aes: false,
        ssse3: true,
        avx2: false,
    });
    assert!(flags.soft_aes);
    assert_eq!(flags.init_kernel, InitKernel::Ssse3);

    flags.apply_cpu_features(CpuFeatures {
        aes: true,
        ssse3: true,
        avx2: true,
    });
    assert!(!flags.soft_aes);
    assert_eq!(flags.init_kernel, InitKernel::Avx2);

    // Must not panic on any target
    let _ = CpuFeatures::detect();
}

#[test]
fn test_alloc_error_messages() {
    assert_eq!(AllocError::Cache.to_string(), "Cache allocation failed");
    assert_eq!(AllocError::Dataset.to_string(), "Dataset allocation failed");
}

#[test]
fn test_reference_vectors() {
    let mut vm = Vm::new(light_state(0));

    let nonce0 = {
        let mut v = vec![0u8; 76];
        v[39..43].copy_from_slice(&0u32.to_le_bytes());
        v
    };
    let nonce1 = {
        let mut v = vec![0u8; 76];
        v[39..43].copy_from_slice(&1u32.to_le_bytes());
        v
    };

    let hash0 = vm.hash(&nonce0);
    let hash1 = vm.hash(&nonce1);

    // Update only when the algorithm changes on purpose
    assert_eq!(
        hex::encode(hash0),
        "a5841200f920ded91e7436ad72fc8553a9e82d371f5e1f44cb1207d294bc3f66",
        "nonce 0 vector changed"
    );
    assert_eq!(
        hex::encode(hash1),
        "3ea0abe2b86590660ff45d068afc1ba2ca14d7c74a73cc2ffbd832d092629970",
        "nonce 1 vector changed"
    );
}

#[test]
fn test_known_vector() {
    let mut vm = Vm::new(light_state(0));
    let hash = vm.hash(b"uhash-core test vector");
    assert_eq!(
        hex::encode(hash),
        "fe0c00d0e0981e63bb8902b724558cc270530d8aa7bf4ad3c36aaa1496fbf81b"
    );

    // Full profile reproduces the same vector
    let mut vm = Vm::new(full_state(0, 2));
    assert_eq!(vm.hash(b"uhash-core test vector"), hash);

    assert_eq!(
        hex::encode(commitment(b"block template", &hash)),
        "ceeb55738ba816eb7bb68899f6b897b839bdf2bbf1dd279e36a5f25073eb000a"
    );
}
