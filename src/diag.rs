//! Thin logging-facade wrappers so call sites in the core modules stay
//! terse. The crate never initializes a logger itself — library crates
//! must not — callers wire up `env_logger`/`tracing-subscriber` the same
//! way `demos/filter_demo.rs` wires `env_logger::init()` in its own
//! binary entry point.

use crate::error::RandomError;

pub fn reseed_skipped(err: RandomError) {
    log::warn!("entropy reseed skipped: {err}");
}

pub fn startup_failed(err: RandomError) {
    log::error!("entropy filter startup failed: {err}");
}
