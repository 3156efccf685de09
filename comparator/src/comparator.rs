//! The trial comparator: runs every request through a primary verifier,
//! answers with the primary outcome, and compares it against a trial
//! verifier in the background.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use tokio::sync::oneshot;
use tracing::{debug, info};

use certcmp_types::{VerifierConfig, VerifyOutcome, VerifyParams};
use certcmp_verification::{
    Completion, IgnorabilityPolicy, ReportSink, RootStoreUpdate, StaticIgnorability,
    TracingReportSink, Verifier, VerifyCallback,
};

use crate::job::Job;
use crate::metrics::ComparatorMetrics;
use crate::settings::ComparatorSettings;
use crate::state::{JobId, Stage};
use crate::tracing_spans;
use crate::ComparatorError;

/// The four verifiers a comparator drives.
pub struct Verifiers {
    /// Answers every request; its outcome is what callers see.
    pub primary: Box<dyn Verifier>,
    /// Re-runs the primary algorithm against the trial's chain.
    pub primary_reverifier: Box<dyn Verifier>,
    pub trial: Box<dyn Verifier>,
    /// A trial verifier that always checks revocation, whatever the
    /// configuration says.
    pub revocation_trial: Box<dyn Verifier>,
}

impl Verifiers {
    pub fn new(
        primary: impl Verifier + 'static,
        primary_reverifier: impl Verifier + 'static,
        trial: impl Verifier + 'static,
        revocation_trial: impl Verifier + 'static,
    ) -> Self {
        Self {
            primary: Box::new(primary),
            primary_reverifier: Box::new(primary_reverifier),
            trial: Box::new(trial),
            revocation_trial: Box::new(revocation_trial),
        }
    }

    fn apply_config(&self, config: &VerifierConfig) {
        self.primary.set_config(config);
        self.primary_reverifier.set_config(config);
        self.trial.set_config(config);
        self.revocation_trial
            .set_config(&config.with_forced_revocation());
    }

    fn update_root_store(&self, update: &RootStoreUpdate) {
        self.primary.update_root_store(update);
        self.primary_reverifier.update_root_store(update);
        self.trial.update_root_store(update);
        self.revocation_trial.update_root_store(update);
    }
}

/// State shared between a comparator and its jobs.
pub(crate) struct Shared {
    // Declared first so live jobs are dropped, cancelling their requests,
    // while the verifiers still exist.
    jobs: RefCell<HashMap<JobId, Rc<RefCell<Job>>>>,
    verifiers: Verifiers,
    config: Cell<VerifierConfig>,
    pub(crate) trial_allowed: Cell<bool>,
    pub(crate) report_sink: Rc<dyn ReportSink>,
    pub(crate) policy: Box<dyn IgnorabilityPolicy>,
    next_job_id: Cell<u64>,
    pub(crate) metrics: ComparatorMetrics,
}

impl Shared {
    pub(crate) fn verifier(&self, stage: Stage) -> &dyn Verifier {
        match stage {
            Stage::Primary => self.verifiers.primary.as_ref(),
            Stage::Trial => self.verifiers.trial.as_ref(),
            Stage::RevocationRecheck => self.verifiers.revocation_trial.as_ref(),
            Stage::PathRecheck => self.verifiers.primary_reverifier.as_ref(),
        }
    }

    /// Remove a finished job. Only called from the job's own completion path.
    pub(crate) fn remove_job(&self, id: JobId) {
        let removed = self.jobs.borrow_mut().remove(&id);
        debug_assert!(removed.is_some(), "job {id} is not live");
        if removed.is_some() {
            self.metrics.jobs_in_flight.dec();
        }
        drop(removed);
    }

    fn mark_config_changed(&self) {
        let jobs: Vec<_> = self.jobs.borrow().values().cloned().collect();
        for job in &jobs {
            job.borrow_mut().config_changed = true;
        }
        if !jobs.is_empty() {
            debug!(jobs = jobs.len(), "marked live jobs as configuration-changed");
        }
    }
}

/// Compares a trial verifier against a primary verifier on live traffic.
///
/// Callers see exactly what the primary verifier alone would have produced.
/// Each request with the trial enabled becomes a job that, once the primary
/// outcome is delivered, runs the trial verifier, classifies the pair, and
/// reports genuine mismatches to the [`ReportSink`]. Dropping the comparator
/// aborts every job still in flight.
///
/// Single-threaded: verifier completions must arrive on the thread that owns
/// the comparator.
pub struct Comparator {
    shared: Rc<Shared>,
}

impl Comparator {
    /// A comparator with the default ignorability rules and configuration.
    pub fn new(verifiers: Verifiers, report_sink: impl ReportSink + 'static) -> Self {
        Self::builder(verifiers).report_sink(report_sink).build()
    }

    pub fn builder(verifiers: Verifiers) -> ComparatorBuilder {
        ComparatorBuilder::new(verifiers)
    }

    /// Verify `params`. Returns the primary outcome, or a pending handle
    /// whose callback receives it; see [`Verifier::verify`].
    pub fn verify(&self, params: &VerifyParams, on_complete: VerifyCallback) -> Completion {
        let shared = &self.shared;
        if !shared.trial_allowed.get() {
            let _enter = tracing_spans::primary_only_span(params.hostname()).entered();
            return shared.verifiers.primary.verify(params, on_complete);
        }

        let id = JobId(shared.next_job_id.get());
        shared.next_job_id.set(id.0 + 1);
        let job = Rc::new(RefCell::new(Job::new(
            id,
            params.clone(),
            shared.config.get(),
            Rc::downgrade(shared),
        )));
        shared.jobs.borrow_mut().insert(id, Rc::clone(&job));
        shared.metrics.jobs_in_flight.inc();

        Job::start(&job, on_complete)
    }

    /// Verify `params`, returning a future that resolves to the primary
    /// outcome.
    ///
    /// Verification starts immediately; the future only waits for the result
    /// and does not borrow the comparator. Dropping it cancels delivery like
    /// dropping a request handle. It fails with [`ComparatorError::Aborted`]
    /// if the comparator is dropped before the primary outcome arrives.
    pub fn verify_async(
        &self,
        params: &VerifyParams,
    ) -> impl Future<Output = Result<VerifyOutcome, ComparatorError>> + 'static {
        let (tx, rx) = oneshot::channel();
        let completion = self.verify(
            params,
            Box::new(move |outcome| {
                let _ = tx.send(outcome);
            }),
        );
        async move {
            match completion {
                Completion::Ready(outcome) => Ok(outcome),
                Completion::Pending(request) => {
                    let outcome = rx.await.map_err(|_| ComparatorError::Aborted);
                    drop(request);
                    outcome
                }
            }
        }
    }

    /// Replace the configuration of every verifier. Jobs already in flight
    /// keep running but will not report a difference.
    pub fn set_config(&self, config: &VerifierConfig) {
        info!(?config, "applying verifier configuration");
        self.shared.config.set(*config);
        self.shared.verifiers.apply_config(config);
        self.shared.mark_config_changed();
    }

    pub fn config(&self) -> VerifierConfig {
        self.shared.config.get()
    }

    /// Push a new root store to every verifier. Like a configuration change,
    /// this invalidates comparisons in flight.
    pub fn update_root_store(&self, update: &RootStoreUpdate) {
        info!(version = update.version, "applying root store update");
        self.shared.verifiers.update_root_store(update);
        self.shared.mark_config_changed();
    }

    /// Turn trial comparison on or off. Jobs whose primary verification is
    /// still pending skip the trial if it is off when the primary completes.
    pub fn set_trial_allowed(&self, allowed: bool) {
        self.shared.trial_allowed.set(allowed);
    }

    pub fn trial_allowed(&self) -> bool {
        self.shared.trial_allowed.get()
    }

    /// Number of comparison jobs in flight.
    pub fn live_jobs(&self) -> usize {
        self.shared.jobs.borrow().len()
    }

    pub fn metrics(&self) -> &ComparatorMetrics {
        &self.shared.metrics
    }
}

impl Verifier for Comparator {
    fn verify(&self, params: &VerifyParams, on_complete: VerifyCallback) -> Completion {
        Comparator::verify(self, params, on_complete)
    }

    fn set_config(&self, config: &VerifierConfig) {
        Comparator::set_config(self, config)
    }

    fn update_root_store(&self, update: &RootStoreUpdate) {
        Comparator::update_root_store(self, update)
    }
}

impl Drop for Comparator {
    fn drop(&mut self) {
        let live = self.shared.jobs.borrow().len();
        if live > 0 {
            debug!(live, "comparator dropped, aborting jobs in flight");
        }
    }
}

/// Builder for [`Comparator`].
pub struct ComparatorBuilder {
    verifiers: Verifiers,
    report_sink: Rc<dyn ReportSink>,
    policy: Box<dyn IgnorabilityPolicy>,
    config: VerifierConfig,
    trial_allowed: bool,
}

impl ComparatorBuilder {
    fn new(verifiers: Verifiers) -> Self {
        Self {
            verifiers,
            report_sink: Rc::new(TracingReportSink),
            policy: Box::new(StaticIgnorability),
            config: VerifierConfig::default(),
            trial_allowed: true,
        }
    }

    pub fn report_sink(mut self, sink: impl ReportSink + 'static) -> Self {
        self.report_sink = Rc::new(sink);
        self
    }

    /// Replace the default [`StaticIgnorability`] rules.
    pub fn policy(mut self, policy: impl IgnorabilityPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn trial_allowed(mut self, allowed: bool) -> Self {
        self.trial_allowed = allowed;
        self
    }

    /// Take the verifier configuration and trial switch from `settings`.
    pub fn settings(self, settings: &ComparatorSettings) -> Self {
        self.config(settings.verifier)
            .trial_allowed(settings.trial_enabled)
    }

    pub fn build(self) -> Comparator {
        self.verifiers.apply_config(&self.config);
        let shared = Shared {
            jobs: RefCell::new(HashMap::new()),
            verifiers: self.verifiers,
            config: Cell::new(self.config),
            trial_allowed: Cell::new(self.trial_allowed),
            report_sink: self.report_sink,
            policy: self.policy,
            next_job_id: Cell::new(0),
            metrics: ComparatorMetrics::new(),
        };
        Comparator {
            shared: Rc::new(shared),
        }
    }
}
