//! Nullable report sink that records reports without sending them.

use std::cell::RefCell;
use std::rc::Rc;

use certcmp_verification::{MismatchReport, ReportSink};

/// A report sink that records reports instead of sending them.
///
/// Clones share the same record.
#[derive(Clone, Default)]
pub struct NullReportSink {
    reports: Rc<RefCell<Vec<MismatchReport>>>,
}

impl NullReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports received so far (for assertions).
    pub fn reports(&self) -> Vec<MismatchReport> {
        self.reports.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.reports.borrow().len()
    }

    /// Clear all state.
    pub fn reset(&self) {
        self.reports.borrow_mut().clear();
    }
}

impl ReportSink for NullReportSink {
    fn report(&self, report: &MismatchReport) {
        self.reports.borrow_mut().push(report.clone());
    }
}
