//! Secure byte storage: zeroized on drop, never implicitly copied.
//!
//! An owned growable buffer, since the entropy pool and the startup blob
//! both need to append incrementally rather than work with a fixed-width
//! array.

use std::ops::Deref;
use zeroize::Zeroize;

/// An owned byte buffer that is wiped when dropped.
///
/// Deliberately does not implement `Clone` — secrets should move or be
/// borrowed, never implicitly duplicated.
#[derive(Default)]
pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self(Vec::with_capacity(cap))
    }

    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    pub fn replace_with(&mut self, bytes: Vec<u8>) {
        self.0.zeroize();
        self.0 = bytes;
    }

    pub fn clear(&mut self) {
        self.0.zeroize();
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
