//! HMAC-DRBG over SHA3-256 (NIST SP 800-90A section 10.1.2).
//!
//! Narrowed to a 32-byte key/value width: this generator is explicitly
//! *not* auto-seeded, and is seeded only through [`HmacDrbg::instantiate`]
//! driven by the entropy filter.

use sha3::{Digest, Sha3_256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// SHA3-256 output width, and therefore the DRBG's key/value width.
pub const SEED_LENGTH: usize = 32;

/// Block size (rate) of SHA3-256 used to pad the HMAC key.
const BLOCK_SIZE: usize = 136;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

fn hmac_sha3_256(key: &[u8], data: &[u8]) -> [u8; SEED_LENGTH] {
    let mut padded_key = [0u8; BLOCK_SIZE];
    if key.len() > BLOCK_SIZE {
        let mut hasher = Sha3_256::new();
        hasher.update(key);
        let hashed: [u8; SEED_LENGTH] = hasher.finalize().into();
        padded_key[..SEED_LENGTH].copy_from_slice(&hashed);
    } else {
        padded_key[..key.len()].copy_from_slice(key);
    }

    let mut inner = Sha3_256::new();
    for byte in padded_key.iter() {
        inner.update([byte ^ IPAD]);
    }
    inner.update(data);
    let inner_hash: [u8; SEED_LENGTH] = inner.finalize().into();

    let mut outer = Sha3_256::new();
    for byte in padded_key.iter() {
        outer.update([byte ^ OPAD]);
    }
    outer.update(inner_hash);
    outer.finalize().into()
}

/// Upper bound on how many times a single instance may be reseeded before
/// it must be fully reinstantiated rather than reseeded again. Analogous
/// to NIST SP 800-90A's `reseed_interval` bound on `generate()` calls,
/// applied here to `reseed()` calls instead, since this subsystem reseeds
/// far more often than it draws bulk output from a single instance.
const MAX_RESEEDS: u64 = 65_536;

/// Minimal HMAC-DRBG state: key `K`, value `V`, an instantiation flag, and
/// a reseed counter bounded by [`MAX_RESEEDS`].
///
/// Unlike a generic NIST DRBG this does not track a maximum-request-size
/// limit — callers only ever ask for small buffers.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HmacDrbg {
    key: [u8; SEED_LENGTH],
    value: [u8; SEED_LENGTH],
    #[zeroize(skip)]
    instantiated: bool,
    #[zeroize(skip)]
    reseed_counter: u64,
}

impl HmacDrbg {
    pub fn new() -> Self {
        Self {
            key: [0u8; SEED_LENGTH],
            value: [0u8; SEED_LENGTH],
            instantiated: false,
            reseed_counter: 0,
        }
    }

    pub fn is_instantiated(&self) -> bool {
        self.instantiated
    }

    /// Whether this instance can still be reseeded via [`HmacDrbg::reseed`].
    /// Becomes `false` once [`MAX_RESEEDS`] reseeds have been performed
    /// since the last [`HmacDrbg::instantiate`]; the caller must then
    /// reinstantiate rather than reseed.
    pub fn accepts_input(&self) -> bool {
        self.reseed_counter < MAX_RESEEDS
    }

    /// `HMAC_DRBG_Instantiate` — seeds `K`/`V` from `seed_material` in one
    /// shot (entropy and any personalization the caller already mixed in).
    pub fn instantiate(&mut self, seed_material: &[u8]) {
        self.key = [0u8; SEED_LENGTH];
        self.value = [0x01; SEED_LENGTH];
        self.update(seed_material);
        self.instantiated = true;
        self.reseed_counter = 0;
    }

    /// `HMAC_DRBG_Reseed` — mixes additional entropy into existing state.
    /// Requires the generator to already be instantiated and to still
    /// [`HmacDrbg::accepts_input`]; callers must check both before calling.
    pub fn reseed(&mut self, seed_material: &[u8]) {
        debug_assert!(self.instantiated, "reseed called before instantiate");
        debug_assert!(
            self.accepts_input(),
            "reseed called after the reseed budget was exhausted"
        );
        self.update(seed_material);
        self.reseed_counter += 1;
    }

    /// Test-only hook so callers can exercise the exhaustion path without
    /// looping `MAX_RESEEDS` times.
    #[cfg(test)]
    pub(crate) fn exhaust_reseed_budget_for_tests(&mut self) {
        self.reseed_counter = MAX_RESEEDS;
    }

    /// `HMAC_DRBG_Generate` — fills `output` with pseudorandom bytes and
    /// updates internal state so the next call produces different output.
    pub fn generate(&mut self, output: &mut [u8]) {
        debug_assert!(self.instantiated, "generate called before instantiate");
        let mut produced = 0usize;
        while produced < output.len() {
            self.value = hmac_sha3_256(&self.key, &self.value);
            let take = (output.len() - produced).min(SEED_LENGTH);
            output[produced..produced + take].copy_from_slice(&self.value[..take]);
            produced += take;
        }
        self.update(&[]);
    }

    /// `HMAC_DRBG_Update` per NIST SP 800-90A section 10.1.2.2.
    fn update(&mut self, provided_data: &[u8]) {
        let mut concat = Vec::with_capacity(SEED_LENGTH + 1 + provided_data.len());
        concat.extend_from_slice(&self.value);
        concat.push(0x00);
        concat.extend_from_slice(provided_data);
        self.key = hmac_sha3_256(&self.key, &concat);
        self.value = hmac_sha3_256(&self.key, &self.value);

        if !provided_data.is_empty() {
            concat.clear();
            concat.extend_from_slice(&self.value);
            concat.push(0x01);
            concat.extend_from_slice(provided_data);
            self.key = hmac_sha3_256(&self.key, &concat);
            self.value = hmac_sha3_256(&self.key, &self.value);
        }

        concat.zeroize();
    }
}

impl Default for HmacDrbg {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiate_then_generate_is_nonzero() {
        let mut drbg = HmacDrbg::new();
        drbg.instantiate(&[0x42; 64]);
        assert!(drbg.is_instantiated());

        let mut out = [0u8; 32];
        drbg.generate(&mut out);
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn successive_generates_differ() {
        let mut drbg = HmacDrbg::new();
        drbg.instantiate(&[0x11; 64]);

        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        drbg.generate(&mut a);
        drbg.generate(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn deterministic_given_same_seed() {
        let mut d1 = HmacDrbg::new();
        d1.instantiate(&[0x99; 64]);
        let mut d2 = HmacDrbg::new();
        d2.instantiate(&[0x99; 64]);

        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        d1.generate(&mut a);
        d2.generate(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn generate_handles_odd_lengths() {
        let mut drbg = HmacDrbg::new();
        drbg.instantiate(&[0x01; 40]);
        let mut out = [0u8; 47];
        drbg.generate(&mut out);
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn fresh_instance_accepts_input() {
        let mut drbg = HmacDrbg::new();
        drbg.instantiate(&[0x07; 32]);
        assert!(drbg.accepts_input());
    }

    #[test]
    fn reseed_increments_counter_and_eventually_stops_accepting_input() {
        let mut drbg = HmacDrbg::new();
        drbg.instantiate(&[0x08; 32]);
        drbg.reseed(b"more entropy");
        assert!(drbg.accepts_input());

        drbg.exhaust_reseed_budget_for_tests();
        assert!(!drbg.accepts_input());
    }

    #[test]
    fn instantiate_resets_an_exhausted_reseed_counter() {
        let mut drbg = HmacDrbg::new();
        drbg.instantiate(&[0x09; 32]);
        drbg.exhaust_reseed_budget_for_tests();
        assert!(!drbg.accepts_input());

        drbg.instantiate(&[0x0a; 32]);
        assert!(drbg.accepts_input());
    }
}
