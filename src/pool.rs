//! The bounded entropy pool: accumulates raw input-event bytes and
//! estimates their entropy content.

use crate::secure_buffer::SecureBytes;
use sha3::{Digest, Sha3_256};

/// An append-only, bounded byte buffer that compresses to a single
/// SHA3-256 digest when it would otherwise overflow.
///
/// No incremental histograms are maintained: the pool is small and
/// bounded, so [`EntropyPool::entropy_bits`] recomputes its estimate
/// fresh from the current contents on every call.
pub struct EntropyPool {
    buf: SecureBytes,
    cap: usize,
}

impl EntropyPool {
    pub fn new(cap: usize) -> Self {
        Self {
            buf: SecureBytes::with_capacity(cap),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// Appends raw octets with no interpretation.
    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.append(bytes);
    }

    /// Replaces the entire contents with `SHA3-256(contents)`.
    pub fn compress(&mut self) {
        let mut hasher = Sha3_256::new();
        hasher.update(self.buf.as_slice());
        let digest: [u8; 32] = hasher.finalize().into();
        self.buf.replace_with(digest.to_vec());
    }

    /// Clears the pool (used after a successful reseed).
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Compresses the pool if it currently exceeds its cap. Called at
    /// the start of post-event pool management.
    pub fn compress_if_over_cap(&mut self) {
        if self.buf.len() > self.cap {
            self.compress();
        }
    }

    /// Returns `(shannon_bits, min_bits)`: a heuristic *total* bit
    /// estimate for the pool's content, each scaled by pool length so a
    /// small-but-random pool and a large-but-slightly-biased pool can
    /// each independently clear the reseed threshold.
    ///
    /// `(0.0, 0.0)` for an empty pool.
    pub fn entropy_bits(&self) -> (f64, f64) {
        let data = self.buf.as_slice();
        if data.is_empty() {
            return (0.0, 0.0);
        }

        let mut counts = [0u32; 256];
        for &b in data {
            counts[b as usize] += 1;
        }
        let len = data.len() as f64;

        let mut shannon_h = 0.0;
        let mut max_count = 0u32;
        for &count in &counts {
            if count > 0 {
                let p = count as f64 / len;
                shannon_h -= p * p.log2();
                if count > max_count {
                    max_count = count;
                }
            }
        }

        let max_freq = max_count as f64 / len;
        let min_h = -max_freq.log2();

        (shannon_h * len, min_h * len)
    }

    /// SHA3-256 digest of the current contents, without mutating the
    /// pool. Used both by the reseed path and by
    /// `EntropyEventFilter::peek_digest`.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(self.buf.as_slice());
        hasher.finalize().into()
    }
}
