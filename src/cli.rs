//! Command-line options

use clap::Parser;
use uhash_core::{CpuFeatures, EngineFlags, InitKernel, Profile};

use crate::affinity::parse_mask;
use crate::config::Config;
use crate::error::HarnessError;
use crate::fingerprint::Fingerprint;
use crate::strategy::Strategy;

#[derive(Debug, Parser)]
#[command(name = "uhash-bench")]
#[command(author = "Cyberia")]
#[command(version)]
#[command(about = "Multi-threaded nonce benchmark for the UniversalHash engine")]
pub struct BenchArgs {
    /// Mining mode: precompute the full dataset
    #[arg(long, conflicts_with = "verify")]
    pub mine: bool,

    /// Verification mode: cache only (default)
    #[arg(long)]
    pub verify: bool,

    /// JIT compiled mode (default: interpreter)
    #[arg(long)]
    pub jit: bool,

    /// W^X policy for JIT pages
    #[arg(long)]
    pub secure: bool,

    /// Use large pages
    #[arg(long = "largePages", alias = "largepages")]
    pub large_pages: bool,

    /// Use software AES
    #[arg(long = "softAes")]
    pub soft_aes: bool,

    /// Number of worker threads
    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    /// Thread affinity bitmask, decimal or 0x-hex (0 = no pinning)
    #[arg(long, default_value = "0", value_parser = parse_mask)]
    pub affinity: u64,

    /// Initialize the dataset with this many threads
    #[arg(long = "init", default_value_t = 1)]
    pub init_threads: usize,

    /// Hash nonces 0..N
    #[arg(long, default_value_t = 1000)]
    pub nonces: u64,

    /// Seed for cache initialization
    #[arg(long, default_value_t = 0)]
    pub seed: u32,

    /// Use the SSSE3 dataset initialization kernel
    #[arg(long)]
    pub ssse3: bool,

    /// Use the AVX2 dataset initialization kernel
    #[arg(long)]
    pub avx2: bool,

    /// Select the best options for the current CPU
    #[arg(long = "auto")]
    pub auto_flags: bool,

    /// Calculate hashes one by one (default: batch)
    #[arg(long = "noBatch")]
    pub no_batch: bool,

    /// Merge commitments instead of hashes
    #[arg(long)]
    pub commit: bool,

    /// Fail unless the final fingerprint equals this hex value
    #[arg(long, value_name = "HEX")]
    pub expect: Option<Fingerprint>,

    /// Also check that light and full profiles hash the template identically
    #[arg(long)]
    pub check: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl BenchArgs {
    /// Build and validate the immutable run configuration
    pub fn to_config(&self) -> Result<Config, HarnessError> {
        let init_kernel = if self.avx2 {
            InitKernel::Avx2
        } else if self.ssse3 {
            InitKernel::Ssse3
        } else {
            InitKernel::Reference
        };

        let mut engine = EngineFlags {
            profile: if self.mine { Profile::Full } else { Profile::Light },
            jit: self.jit,
            secure: self.secure,
            large_pages: self.large_pages,
            soft_aes: self.soft_aes,
            init_kernel,
        };
        if self.auto_flags {
            engine.apply_cpu_features(CpuFeatures::detect());
        }

        let config = Config {
            engine,
            threads: self.threads,
            affinity: self.affinity,
            init_threads: self.init_threads,
            nonces: self.nonces,
            seed: self.seed,
            strategy: Strategy::select(!self.no_batch, self.commit),
        };
        config.validate()?;
        Ok(config)
    }
}
