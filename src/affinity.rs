//! Worker to CPU mapping and thread pinning

use crate::error::AffinityError;

/// CPU for worker `worker` under an affinity bitmask
///
/// Worker `i` gets the `i`-th set bit of `mask`, wrapping around when there
/// are more workers than set bits. A zero mask disables pinning.
pub fn cpu_for_worker(mask: u64, worker: usize) -> Option<usize> {
    let cpus = mask.count_ones() as usize;
    if cpus == 0 {
        return None;
    }

    let mut nth = worker % cpus;
    let mut bits = mask;
    loop {
        let cpu = bits.trailing_zeros() as usize;
        if nth == 0 {
            return Some(cpu);
        }
        nth -= 1;
        bits &= bits - 1;
    }
}

/// Pin the calling thread to `cpu`
pub fn bind_current_thread(cpu: usize) -> Result<(), AffinityError> {
    if core_affinity::set_for_current(core_affinity::CoreId { id: cpu }) {
        Ok(())
    } else {
        Err(AffinityError { cpu })
    }
}

/// Parse an affinity mask given in decimal or `0x`-prefixed hex
pub fn parse_mask(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid affinity mask '{}': {}", s, e))
}
