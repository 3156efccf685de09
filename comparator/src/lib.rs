//! Trial certificate-verification comparator.
//!
//! The comparator sits where a single certificate verifier would and:
//! - answers every request with the primary verifier's outcome, unchanged
//! - runs the trial verifier on the same request once the primary finishes
//! - explains away known-benign differences, re-verifying where a second
//!   opinion can settle it (platform revocation quirks, divergent chains)
//! - reports whatever disagreement is left to a [`certcmp_verification::ReportSink`]
//!
//! Each request becomes a job state machine that outlives the caller's
//! interest in it and removes itself from the comparator when done.

pub mod comparator;
mod compare;
pub mod error;
mod job;
pub mod metrics;
pub mod request;
pub mod settings;
pub mod state;
pub mod tracing_spans;

pub use comparator::{Comparator, ComparatorBuilder, Verifiers};
pub use error::ComparatorError;
pub use metrics::ComparatorMetrics;
pub use request::RequestHandle;
pub use settings::ComparatorSettings;
pub use state::{JobId, Stage};
