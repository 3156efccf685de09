//! Pre-built [`tracing::Span`] constructors for comparator operations.
//!
//! Using consistent span names and field sets makes it easy to follow one
//! request through its primary, trial and recheck phases in the logs.

use tracing::{debug_span, info_span, Span};

use crate::JobId;

/// Span covering one trial comparison job, from primary start to finish.
pub fn trial_job_span(job: JobId, hostname: &str) -> Span {
    info_span!("trial_job", job = %job, host = %hostname)
}

/// Span covering a direct primary verification with the trial disabled.
pub fn primary_only_span(hostname: &str) -> Span {
    debug_span!("primary_only", host = %hostname)
}
