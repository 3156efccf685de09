//! Reporting of genuine mismatches.

use std::sync::Arc;

use serde::Serialize;

use certcmp_types::{CertChain, VerifierConfig, VerifyOutcome, VerifyParams};

/// Everything a collector needs to reproduce a mismatch: the request, the
/// configuration active when the comparison started, and both original
/// outcomes. Recheck outcomes are never included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MismatchReport {
    pub hostname: String,
    pub certificate: Arc<CertChain>,
    pub enable_rev_checking: bool,
    pub require_rev_checking_local_anchors: bool,
    pub allow_weak_legacy_roots: bool,
    pub disallow_known_weak_cas: bool,
    pub ocsp_response: Vec<u8>,
    pub sct_list: Vec<u8>,
    pub primary: VerifyOutcome,
    pub trial: VerifyOutcome,
}

impl MismatchReport {
    pub fn new(
        params: &VerifyParams,
        config: &VerifierConfig,
        primary: VerifyOutcome,
        trial: VerifyOutcome,
    ) -> Self {
        Self {
            hostname: params.hostname().to_string(),
            certificate: Arc::clone(params.certificate()),
            enable_rev_checking: config.enable_rev_checking,
            require_rev_checking_local_anchors: config.require_rev_checking_local_anchors,
            allow_weak_legacy_roots: config.allow_weak_legacy_roots,
            disallow_known_weak_cas: config.disallow_known_weak_cas,
            ocsp_response: params.ocsp_response().to_vec(),
            sct_list: params.sct_list().to_vec(),
            primary,
            trial,
        }
    }
}

/// Fire-and-forget collector for mismatch reports.
///
/// A sink may tear down the comparator that called it; the comparator
/// tolerates that.
pub trait ReportSink {
    fn report(&self, report: &MismatchReport);
}

impl<F> ReportSink for F
where
    F: Fn(&MismatchReport),
{
    fn report(&self, report: &MismatchReport) {
        self(report)
    }
}

/// Writes each report to the log as a JSON document.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReportSink;

impl ReportSink for TracingReportSink {
    fn report(&self, report: &MismatchReport) {
        match serde_json::to_string(report) {
            Ok(json) => tracing::warn!(
                host = %report.hostname,
                primary = report.primary.net_code(),
                trial = report.trial.net_code(),
                report = %json,
                "trial verification mismatch"
            ),
            Err(e) => tracing::error!(
                host = %report.hostname,
                error = %e,
                "failed to serialize mismatch report"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certcmp_types::{CertError, Certificate, VerifyFlags, VerifyResult};
    use std::cell::RefCell;

    #[test]
    fn report_copies_request_and_config() {
        let chain = Arc::new(CertChain::leaf_only(Certificate::from_der(vec![1, 2, 3])));
        let params = VerifyParams::new(
            Arc::clone(&chain),
            "host.test",
            VerifyFlags::NONE,
            vec![5],
            vec![6],
        );
        let config = VerifierConfig {
            enable_rev_checking: true,
            disallow_known_weak_cas: true,
            ..VerifierConfig::default()
        };
        let primary = VerifyOutcome::ok(VerifyResult::new(Arc::clone(&chain)));
        let trial = VerifyOutcome::err(CertError::Revoked, VerifyResult::new(chain));

        let report = MismatchReport::new(&params, &config, primary.clone(), trial.clone());
        assert_eq!(report.hostname, "host.test");
        assert!(report.enable_rev_checking);
        assert!(!report.require_rev_checking_local_anchors);
        assert!(!report.allow_weak_legacy_roots);
        assert!(report.disallow_known_weak_cas);
        assert_eq!(report.ocsp_response, vec![5]);
        assert_eq!(report.sct_list, vec![6]);
        assert_eq!(report.primary, primary);
        assert_eq!(report.trial, trial);
    }

    #[test]
    fn report_serializes_to_json() {
        let chain = Arc::new(CertChain::leaf_only(Certificate::from_der(vec![1])));
        let params = VerifyParams::for_host(Arc::clone(&chain), "json.test");
        let outcome = VerifyOutcome::ok(VerifyResult::new(chain));
        let report = MismatchReport::new(
            &params,
            &VerifierConfig::default(),
            outcome.clone(),
            outcome,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["hostname"], "json.test");
        assert!(json["primary"]["error"].is_null());
    }

    #[test]
    fn closures_are_sinks() {
        let seen = RefCell::new(Vec::new());
        let sink = |r: &MismatchReport| seen.borrow_mut().push(r.hostname.clone());
        let chain = Arc::new(CertChain::leaf_only(Certificate::from_der(vec![1])));
        let params = VerifyParams::for_host(Arc::clone(&chain), "closure.test");
        let outcome = VerifyOutcome::ok(VerifyResult::new(chain));
        sink.report(&MismatchReport::new(
            &params,
            &VerifierConfig::default(),
            outcome.clone(),
            outcome,
        ));
        assert_eq!(seen.into_inner(), vec!["closure.test".to_string()]);
    }
}
