//! The verifier seam and the vocabulary of trial comparison.
//!
//! A comparator runs two certificate verifiers side by side and classifies
//! how their outcomes relate. This crate defines:
//! - the [`Verifier`] contract every compared verifier implements, including
//!   synchronous-or-pending completion and cancellation by drop;
//! - the [`Classification`] taxonomy a comparison ends in;
//! - the [`IgnorabilityPolicy`] predicate that explains away known-benign
//!   differences, with a default rule set in [`StaticIgnorability`];
//! - the [`ReportSink`] that receives genuine mismatches.

pub mod classification;
pub mod ignorable;
pub mod report;
pub mod verifier;

pub use classification::{Classification, IgnoredReason, MismatchKind};
pub use ignorable::{IgnorabilityPolicy, StaticIgnorability};
pub use report::{MismatchReport, ReportSink, TracingReportSink};
pub use verifier::{Completion, Request, RootStoreUpdate, Verifier, VerifyCallback};
