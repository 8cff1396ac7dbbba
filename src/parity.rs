//! Light / full profile parity check
//!
//! Hashes the template once with a light-profile state and once with a
//! full-profile state built from the same seed. The two must agree; a
//! mismatch means dataset construction and on-demand derivation diverged.

use std::sync::Arc;

use log::info;
use uhash_core::Profile;

use crate::config::Config;
use crate::engine::{Engine, Hash, HashVm};
use crate::error::HarnessError;
use crate::template::WorkTemplate;

/// Template hash under both profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileParity {
    pub light: Hash,
    pub full: Hash,
}

impl ProfileParity {
    pub fn matches(&self) -> bool {
        self.light == self.full
    }
}

/// Hash `template` (nonce 0) under both profiles of `config`'s engine flags
pub fn check_profile_parity<E: Engine>(
    config: &Config,
    template: &WorkTemplate,
) -> Result<ProfileParity, HarnessError> {
    let input = template.item(0);
    let hash_with = |profile: Profile| -> Result<Hash, HarnessError> {
        let mut engine = E::allocate(&config.engine.with_profile(profile))?;
        engine.initialize(&config.seed_bytes(), config.init_threads);
        let engine = Arc::new(engine);
        let mut vm = E::create_vm(&engine);
        Ok(vm.hash(input.as_bytes()))
    };

    let parity = ProfileParity {
        light: hash_with(Profile::Light)?,
        full: hash_with(Profile::Full)?,
    };
    info!(
        "profile parity: light {} / full {}",
        hex::encode(parity.light),
        hex::encode(parity.full)
    );
    Ok(parity)
}
