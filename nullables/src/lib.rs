//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the comparator is abstracted behind a trait. This
//! crate provides test-friendly implementations that:
//! - Return scripted outcomes
//! - Complete synchronously or hold completions until the test releases them
//! - Record every call, configuration change and cancellation
//!
//! Usage: hand clones of these to a comparator and keep the originals for
//! driving completions and making assertions.

pub mod report;
pub mod verifier;

pub use report::NullReportSink;
pub use verifier::NullVerifier;
