// tests/support/mod.rs
// Shared helpers for the integration test binaries. Each test crate uses a
// different subset, which would otherwise trip dead_code warnings.
#[allow(dead_code, unused_imports)]
pub mod helpers;

#[allow(unused_imports)]
pub use helpers::*;
