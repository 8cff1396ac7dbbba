//! Engine flags and CPU feature detection

use core::fmt;

/// Resource profile of the shared state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Cache only; dataset items are derived on demand (verification)
    #[default]
    Light,
    /// Cache plus a precomputed dataset (mining)
    Full,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Light => write!(f, "light ({} KB cache)", crate::CACHE_SIZE / 1024),
            Profile::Full => write!(
                f,
                "full ({} KB cache + {} KB dataset)",
                crate::CACHE_SIZE / 1024,
                crate::DATASET_SIZE / 1024
            ),
        }
    }
}

/// Code path used for the one-time dataset initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitKernel {
    #[default]
    Reference,
    Ssse3,
    Avx2,
}

impl InitKernel {
    /// Pick the fastest kernel the CPU supports
    pub fn best_for(cpu: CpuFeatures) -> Self {
        if cpu.avx2 {
            InitKernel::Avx2
        } else if cpu.ssse3 {
            InitKernel::Ssse3
        } else {
            InitKernel::Reference
        }
    }
}

impl fmt::Display for InitKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitKernel::Reference => "reference",
            InitKernel::Ssse3 => "ssse3",
            InitKernel::Avx2 => "avx2",
        };
        f.write_str(name)
    }
}

/// Flags passed to [`SharedState::allocate`](crate::SharedState::allocate)
///
/// `jit`, `secure` and `large_pages` are accepted for compatibility with
/// other engines; this engine runs interpreted on ordinary pages and logs
/// when they are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineFlags {
    pub profile: Profile,
    pub jit: bool,
    pub secure: bool,
    pub large_pages: bool,
    pub soft_aes: bool,
    pub init_kernel: InitKernel,
}

impl EngineFlags {
    /// Same flags with a different resource profile
    pub fn with_profile(self, profile: Profile) -> Self {
        Self { profile, ..self }
    }

    /// Apply detected CPU capabilities (`--auto`)
    pub fn apply_cpu_features(&mut self, cpu: CpuFeatures) {
        self.soft_aes = !cpu.aes;
        self.init_kernel = InitKernel::best_for(cpu);
    }
}

/// CPU capabilities relevant to engine flag selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuFeatures {
    pub aes: bool,
    pub ssse3: bool,
    pub avx2: bool,
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
cpufeatures::new!(cpuid_aes, "aes");
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
cpufeatures::new!(cpuid_ssse3, "ssse3");
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
cpufeatures::new!(cpuid_avx2, "avx2");

impl CpuFeatures {
    /// Detect capabilities of the current CPU
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub fn detect() -> Self {
        Self {
            aes: cpuid_aes::get(),
            ssse3: cpuid_ssse3::get(),
            avx2: cpuid_avx2::get(),
        }
    }

    /// Detect capabilities of the current CPU
    #[cfg(target_arch = "aarch64")]
    pub fn detect() -> Self {
        Self {
            aes: std::arch::is_aarch64_feature_detected!("aes"),
            ssse3: false,
            avx2: false,
        }
    }

    /// Detect capabilities of the current CPU
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    pub fn detect() -> Self {
        Self::default()
    }
}
