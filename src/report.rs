//! Run report

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::error::HarnessError;
use crate::fingerprint::Fingerprint;
use crate::strategy::Strategy;

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub fingerprint: Fingerprint,
    pub strategy: Strategy,
    pub threads: usize,
    pub nonces: u64,
    /// Hashes merged over all workers; equals `nonces` for a complete run
    pub hashes: u64,
    pub per_worker: Vec<u64>,
    /// Values issued by the work counter; each worker overshoots the bound once
    pub claims: u64,
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs")]
    pub elapsed: Duration,
}

impl Report {
    /// Hashes per second of wall time
    pub fn hashrate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.hashes as f64 / secs
        } else {
            0.0
        }
    }

    /// Compare the fingerprint against a known-good value
    pub fn verify(&self, expected: &Fingerprint) -> Result<(), HarnessError> {
        if self.fingerprint == *expected {
            Ok(())
        } else {
            Err(HarnessError::FingerprintMismatch {
                expected: *expected,
                actual: self.fingerprint,
            })
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn as_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}
