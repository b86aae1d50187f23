//! Deterministic execution support.
//!
//! The only engine-level capability the estimators need is a reproducible
//! random number stream, threaded explicitly into every sampling call.

pub mod rng;

pub use rng::SimRng;
