//! The caller's handle to a pending comparison.

use std::cell::RefCell;
use std::rc::Weak;

use tracing::debug;

use certcmp_verification::Request;

use crate::job::Job;

/// Returned to the caller when the primary verification is pending.
///
/// Dropping it before the primary outcome arrives cancels delivery to the
/// caller. The comparison itself keeps running.
pub struct RequestHandle {
    job: Weak<RefCell<Job>>,
}

impl RequestHandle {
    pub(crate) fn new(job: Weak<RefCell<Job>>) -> Self {
        Self { job }
    }
}

impl Request for RequestHandle {}

impl Drop for RequestHandle {
    fn drop(&mut self) {
        let Some(job) = self.job.upgrade() else {
            return;
        };
        let client = match job.try_borrow_mut() {
            Ok(mut job) => job.client.take(),
            Err(_) => None,
        };
        if client.is_some() {
            debug!("caller cancelled before primary completion");
        }
        // Dropped outside the borrow: the callback's captures may reach back
        // into the comparator.
        drop(client);
    }
}
