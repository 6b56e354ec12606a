//! Crate-wide error types.

use thiserror::Error;

/// Errors raised by [`crate::random::Random`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RandomError {
    /// A hash or XOF primitive could not be constructed. Fatal at
    /// startup, a skipped-operation at runtime.
    #[error("hash primitive unavailable")]
    HashUnavailable,

    /// `reseed_user_rng` was called before `initialize_user_rng`.
    #[error("user RNG has not been seeded")]
    RngNotSeeded,

    /// The DRBG has exhausted its reseed budget (see
    /// `HmacDrbg::accepts_input`) and must be fully reinstantiated rather
    /// than reseeded again.
    #[error("user RNG rejects additional entropy")]
    RngRejectsInput,

    /// The system CSPRNG failed to produce output.
    #[error("system RNG failure")]
    SystemRngFailure,
}

/// Errors raised by [`crate::event_filter::EntropyEventFilter`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// Startup failed because the user RNG could not be initialized.
    #[error("entropy filter startup failed: {0}")]
    StartupFailed(#[source] RandomError),
}
