//! Tunable constants for the entropy subsystem.
//!
//! The numbers themselves are fixed by the security design;
//! [`PoolConfig::from_env`] exists only so tests can shrink
//! `min_reseed_interval_ms` without a production code path ever seeing an
//! overridden value.

/// Heuristic total-entropy threshold (bits) a pool must clear, on both
/// the Shannon and min-entropy estimators, before a reseed is allowed.
pub const SECURITY_LEVEL: f64 = 256.0;

/// Minimum time between two successful reseeds.
pub const MIN_RESEED_INTERVAL_MS: i64 = 5000;

/// Hard cap on the entropy pool's byte length.
pub const POOL_CAP: usize = 4096;

/// Bundled, overridable view of the above three constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolConfig {
    pub pool_cap: usize,
    pub security_level_bits: f64,
    pub min_reseed_interval_ms: i64,
}

impl PoolConfig {
    pub const fn production() -> Self {
        Self {
            pool_cap: POOL_CAP,
            security_level_bits: SECURITY_LEVEL,
            min_reseed_interval_ms: MIN_RESEED_INTERVAL_MS,
        }
    }

    /// Reads `ENTROPY_CORE_MIN_RESEED_INTERVAL_MS` to shorten the reseed
    /// gate for integration tests; falls back to [`Self::production`] for
    /// any field that is absent or unparseable.
    pub fn from_env() -> Self {
        let mut cfg = Self::production();
        if let Ok(val) = std::env::var("ENTROPY_CORE_MIN_RESEED_INTERVAL_MS") {
            if let Ok(parsed) = val.parse() {
                cfg.min_reseed_interval_ms = parsed;
            }
        }
        cfg
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::production()
    }
}
