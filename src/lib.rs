//! Entropy collection and two-source random-number generation for an
//! interactive, security-sensitive desktop application.
//!
//! Three components, leaves first:
//!
//! - [`pool`] — a bounded byte buffer that accumulates raw input-event
//!   bytes and estimates their entropy content.
//! - [`event_filter`] — receives input events, feeds the pool, and
//!   triggers reseeds of the process-wide [`random::Random`] singleton.
//! - [`random`] — mixes an OS CSPRNG with a user-seeded HMAC-DRBG
//!   through a SHAKE-256 extendable-output function.
//!
//! Consumers obtain the two process-wide singletons through
//! [`random_instance`] and [`filter_instance`]; constructing the filter
//! singleton performs startup entropy collection and seeds the random
//! singleton exactly once, before any random bytes may be drawn.

pub mod config;
pub mod diag;
pub mod drbg;
pub mod error;
pub mod event_filter;
pub mod pool;
pub mod random;
mod random_tests;
pub mod secure_buffer;

pub use error::{FilterError, RandomError};
pub use event_filter::{EntropyEventFilter, EventSink, InputEvent, PassThrough};
pub use pool::EntropyPool;
pub use random::{Random, UserRngState};

use once_cell::sync::Lazy;

static RANDOM: Lazy<Random> = Lazy::new(Random::new);

/// The process-wide [`Random`] instance. Constructed on first access and
/// never destroyed before process exit.
pub fn random_instance() -> &'static Random {
    &RANDOM
}

static FILTER: Lazy<EntropyEventFilter> = Lazy::new(|| {
    EntropyEventFilter::new(random_instance(), config::PoolConfig::production()).unwrap_or_else(
        |err| {
            let FilterError::StartupFailed(inner) = err;
            diag::startup_failed(inner);
            panic!("entropy filter startup failed: {err}");
        },
    )
});

/// The process-wide [`EntropyEventFilter`] instance. Must be installed on
/// the host's event dispatcher during startup, before any random bytes
/// are consumed — constructing it is what seeds [`random_instance`].
pub fn filter_instance() -> &'static EntropyEventFilter {
    &FILTER
}
