//! End-to-end runs against the bundled UniversalHash engine

use std::sync::Arc;

use uhash_bench::parity::check_profile_parity;
use uhash_bench::{run, Config, Fingerprint, HarnessError, Strategy, WorkTemplate};
use uhash_core::{commitment, EngineFlags, Profile, SharedState, Vm};

const NONCES: u64 = 24;

fn config(threads: usize, strategy: Strategy) -> Config {
    Config {
        threads,
        nonces: NONCES,
        strategy,
        ..Config::default()
    }
}

fn light_state(seed: u32) -> Arc<SharedState> {
    let mut state = SharedState::allocate(EngineFlags::default()).unwrap();
    state.initialize(&seed.to_le_bytes(), 1);
    Arc::new(state)
}

#[test]
fn test_fingerprint_independent_of_threads_and_batching() {
    let reference = run::<SharedState>(config(1, Strategy::Hash)).unwrap();
    assert!(!reference.fingerprint.is_zero());

    for threads in [1, 3, 4] {
        for strategy in [Strategy::Hash, Strategy::Batch] {
            let report = run::<SharedState>(config(threads, strategy)).unwrap();
            assert_eq!(
                report.fingerprint, reference.fingerprint,
                "{} on {} threads",
                strategy, threads
            );
            assert_eq!(report.hashes, NONCES);
        }
    }
}

#[test]
fn test_commitment_fingerprint() {
    let raw = run::<SharedState>(config(2, Strategy::Batch)).unwrap();
    let committed = run::<SharedState>(config(2, Strategy::BatchCommit)).unwrap();
    let single = run::<SharedState>(config(1, Strategy::HashCommit)).unwrap();

    assert_ne!(raw.fingerprint, committed.fingerprint);
    assert_eq!(committed.fingerprint, single.fingerprint);
}

#[test]
fn test_matches_direct_engine_calls() {
    let template = WorkTemplate::default();
    let mut vm = Vm::new(light_state(0));

    let mut raw = Fingerprint::ZERO;
    let mut committed = Fingerprint::ZERO;
    for nonce in 0..NONCES as u32 {
        let item = template.item(nonce);
        let hash = vm.hash(item.as_bytes());
        raw ^= Fingerprint::from_hash(&hash);
        committed ^= Fingerprint::from_hash(&commitment(item.as_bytes(), &hash));
    }

    let report = run::<SharedState>(config(4, Strategy::Batch)).unwrap();
    assert_eq!(report.fingerprint, raw);

    let report = run::<SharedState>(config(4, Strategy::BatchCommit)).unwrap();
    assert_eq!(report.fingerprint, committed);
}

#[test]
fn test_single_nonce_is_the_template_hash() {
    let config = Config {
        nonces: 1,
        strategy: Strategy::Hash,
        ..Config::default()
    };
    let report = run::<SharedState>(config).unwrap();

    let mut vm = Vm::new(light_state(0));
    let hash = vm.hash(WorkTemplate::default().item(0).as_bytes());
    assert_eq!(report.fingerprint, Fingerprint::from_hash(&hash));
    assert_eq!(report.fingerprint.to_bytes(), hash);
}

#[test]
fn test_zero_nonces() {
    let config = Config {
        nonces: 0,
        threads: 4,
        ..Config::default()
    };
    let report = run::<SharedState>(config).unwrap();
    assert!(report.fingerprint.is_zero());
    assert_eq!(report.hashes, 0);
}

#[test]
fn test_seed_changes_fingerprint() {
    let seed0 = run::<SharedState>(config(2, Strategy::Batch)).unwrap();
    let seed1 = run::<SharedState>(Config {
        seed: 1,
        ..config(2, Strategy::Batch)
    })
    .unwrap();
    assert_ne!(seed0.fingerprint, seed1.fingerprint);
}

#[test]
fn test_light_and_full_profiles_agree() {
    let light = run::<SharedState>(config(2, Strategy::Batch)).unwrap();

    let mut full_config = config(2, Strategy::Batch);
    full_config.engine = full_config.engine.with_profile(Profile::Full);
    full_config.init_threads = 2;
    let full = run::<SharedState>(full_config).unwrap();

    assert_eq!(light.fingerprint, full.fingerprint);
}

#[test]
fn test_profile_parity_check() {
    let parity = check_profile_parity::<SharedState>(&Config::default(), &WorkTemplate::default())
        .unwrap();
    assert!(parity.matches());
}

#[test]
fn test_expected_fingerprint() {
    let report = run::<SharedState>(config(2, Strategy::Hash)).unwrap();
    let printed: Fingerprint = report.fingerprint.to_string().parse().unwrap();
    assert!(report.verify(&printed).is_ok());

    let mut wrong = printed;
    wrong.0[0] ^= 1;
    assert!(matches!(
        report.verify(&wrong),
        Err(HarnessError::FingerprintMismatch { .. })
    ));
}

/// Seed 0, default template, nonces 0..5
const FINGERPRINT_5: &str = "ce69c2f0ec12df9b442bb110517d283ab450f7942aa31e3a17fce94a766ae617";
const COMMITTED_FINGERPRINT_5: &str =
    "563e32eb99b6c64ba81e013b725026fb70b24cc99290b87f079ed40843a97e97";

#[test]
fn test_known_fingerprints() {
    let expected: Fingerprint = FINGERPRINT_5.parse().unwrap();
    let committed: Fingerprint = COMMITTED_FINGERPRINT_5.parse().unwrap();

    for (threads, strategy) in [(1, Strategy::Hash), (3, Strategy::Batch)] {
        let report = run::<SharedState>(Config {
            threads,
            nonces: 5,
            strategy,
            ..Config::default()
        })
        .unwrap();
        assert_eq!(report.fingerprint.to_string(), FINGERPRINT_5);
        assert!(report.verify(&expected).is_ok());
    }

    let mut full = Config {
        threads: 2,
        nonces: 5,
        strategy: Strategy::BatchCommit,
        ..Config::default()
    };
    full.engine = full.engine.with_profile(Profile::Full);
    let report = run::<SharedState>(full).unwrap();
    assert_eq!(report.fingerprint, committed);
}

#[test]
fn test_first_nonce_vector() {
    let report = run::<SharedState>(Config {
        nonces: 1,
        ..Config::default()
    })
    .unwrap();
    assert_eq!(
        report.fingerprint.to_string(),
        "b1bba3fb1d08b120b89f46b2710fb0803bc88c5f2c5c15b34b3fe70c09fb37a2"
    );
}
