//! The per-request trial comparison state machine.
//!
//! A job is owned by its comparator's live-job map and removes itself from
//! that map when it finishes. Everything else refers to it weakly: verifier
//! callbacks, the caller's [`crate::RequestHandle`], and the job's own link
//! back to the comparator. The caller's callback and the report sink may drop
//! the comparator, so a job never holds a `RefCell` borrow or a strong
//! reference to the comparator across either call, and re-checks that the
//! comparator is alive afterwards.

use std::cell::RefCell;
use std::mem;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn, Span};

use certcmp_types::{VerifierConfig, VerifyOutcome, VerifyParams};
use certcmp_verification::{Classification, Completion, MismatchReport, Request, VerifyCallback};

use crate::comparator::Shared;
use crate::compare::{self, Decision};
use crate::request::RequestHandle;
use crate::state::{JobId, JobState, Stage};
use crate::tracing_spans;

pub(crate) struct Job {
    id: JobId,
    params: VerifyParams,
    /// Configuration in force when the job was created.
    config: VerifierConfig,
    pub(crate) config_changed: bool,
    parent: Weak<Shared>,
    state: JobState,
    /// The caller's callback, until the primary outcome is delivered or the
    /// caller cancels.
    pub(crate) client: Option<VerifyCallback>,
    /// The outstanding verifier request, at most one at a time.
    pending: Option<Box<dyn Request>>,
    stage_started: Instant,
    span: Span,
}

impl Job {
    pub(crate) fn new(
        id: JobId,
        params: VerifyParams,
        config: VerifierConfig,
        parent: Weak<Shared>,
    ) -> Self {
        let span = tracing_spans::trial_job_span(id, params.hostname());
        Self {
            id,
            params,
            config,
            config_changed: false,
            parent,
            state: JobState::PrimaryPending,
            client: None,
            pending: None,
            stage_started: Instant::now(),
            span,
        }
    }

    /// Run the primary verifier. The returned completion is what the caller
    /// sees: the primary outcome, or a handle to a pending primary request.
    pub(crate) fn start(this: &Rc<RefCell<Job>>, client: VerifyCallback) -> Completion {
        let (params, span) = {
            let job = this.borrow();
            (job.params.clone(), job.span.clone())
        };
        let _enter = span.enter();

        match Job::begin(this, Stage::Primary, &params, JobState::PrimaryPending) {
            Some(outcome) => {
                // The caller gets the outcome by return; its callback is
                // dropped unused.
                drop(client);
                Job::on_complete(this, outcome.clone());
                Completion::Ready(outcome)
            }
            None => {
                this.borrow_mut().client = Some(client);
                Completion::Pending(Box::new(RequestHandle::new(Rc::downgrade(this))))
            }
        }
    }

    fn callback(this: &Rc<RefCell<Job>>) -> VerifyCallback {
        let job = Rc::downgrade(this);
        Box::new(move |outcome| {
            if let Some(job) = job.upgrade() {
                Job::on_complete(&job, outcome);
            }
        })
    }

    /// Move to `next` and call the verifier for `stage`. Returns the outcome
    /// if the verifier finished synchronously; otherwise the request is kept
    /// until its callback arrives.
    fn begin(
        this: &Rc<RefCell<Job>>,
        stage: Stage,
        params: &VerifyParams,
        next: JobState,
    ) -> Option<VerifyOutcome> {
        let shared = this.borrow().parent.upgrade()?;
        {
            let mut job = this.borrow_mut();
            job.state = next;
            job.stage_started = Instant::now();
        }
        debug!(stage = stage.as_str(), "starting verification");

        let completion = shared.verifier(stage).verify(params, Job::callback(this));
        drop(shared);

        match completion {
            Completion::Ready(outcome) => Some(outcome),
            Completion::Pending(request) => {
                this.borrow_mut().pending = Some(request);
                None
            }
        }
    }

    /// Dispatch a verifier outcome to the handler for the current state.
    fn on_complete(this: &Rc<RefCell<Job>>, outcome: VerifyOutcome) {
        let (state, request, span) = {
            let mut job = this.borrow_mut();
            let state = mem::replace(&mut job.state, JobState::Comparing);
            (state, job.pending.take(), job.span.clone())
        };
        drop(request);
        let _enter = span.enter();

        match state {
            JobState::PrimaryPending => Job::on_primary_complete(this, outcome),
            JobState::TrialPending { primary } => Job::on_trial_complete(this, primary, outcome),
            JobState::RevocationRecheckPending { primary, trial } => {
                debug!(recheck = outcome.net_code(), "revocation recheck complete");
                let classification = compare::after_revocation_recheck(&primary, &trial, &outcome);
                Job::finish(this, classification, primary, trial);
            }
            JobState::PathRecheckPending { primary, trial } => {
                debug!(recheck = outcome.net_code(), "path recheck complete");
                let Some(shared) = this.borrow().parent.upgrade() else {
                    return;
                };
                let config = this.borrow().config;
                let classification = compare::after_path_recheck(
                    &primary,
                    &trial,
                    &outcome,
                    &config,
                    shared.policy.as_ref(),
                );
                drop(shared);
                Job::finish(this, classification, primary, trial);
            }
            state @ (JobState::Comparing | JobState::Finished) => {
                error!(state = state.as_str(), "verifier completed with no request outstanding");
                this.borrow_mut().state = state;
            }
        }
    }

    fn on_primary_complete(this: &Rc<RefCell<Job>>, primary: VerifyOutcome) {
        debug!(primary = primary.net_code(), "primary verification complete");

        let client = this.borrow_mut().client.take();
        if let Some(client) = client {
            client(primary.clone());
        }

        // Delivering the outcome may have torn down the comparator.
        let Some(shared) = this.borrow().parent.upgrade() else {
            debug!("comparator dropped during primary delivery");
            return;
        };

        let (id, config_changed, params, elapsed) = {
            let job = this.borrow();
            (
                job.id,
                job.config_changed,
                job.params.clone(),
                job.stage_started.elapsed(),
            )
        };
        shared.metrics.observe_primary_latency(elapsed);
        if config_changed || !shared.trial_allowed.get() {
            debug!(config_changed, "skipping trial verification");
            this.borrow_mut().state = JobState::Finished;
            shared.remove_job(id);
            return;
        }
        drop(shared);

        if let Some(trial) = Job::begin(this, Stage::Trial, &params, JobState::TrialPending { primary })
        {
            Job::on_complete(this, trial);
        }
    }

    fn on_trial_complete(this: &Rc<RefCell<Job>>, primary: VerifyOutcome, trial: VerifyOutcome) {
        debug!(trial = trial.net_code(), "trial verification complete");

        let Some(shared) = this.borrow().parent.upgrade() else {
            return;
        };
        let (config, config_changed, params, elapsed) = {
            let job = this.borrow();
            (
                job.config,
                job.config_changed,
                job.params.clone(),
                job.stage_started.elapsed(),
            )
        };
        shared.metrics.observe_trial_latency(elapsed);
        let decision = compare::after_trial(
            &primary,
            &trial,
            &config,
            config_changed,
            shared.policy.as_ref(),
        );
        drop(shared);

        let recheck = match decision {
            Decision::Finish(classification) => {
                Job::finish(this, classification, primary, trial);
                return;
            }
            Decision::RecheckRevocation => Job::begin(
                this,
                Stage::RevocationRecheck,
                &params,
                JobState::RevocationRecheckPending { primary, trial },
            ),
            Decision::ReverifyTrialChain => {
                let target = params.with_certificate(Arc::clone(&trial.result.verified_chain));
                Job::begin(
                    this,
                    Stage::PathRecheck,
                    &target,
                    JobState::PathRecheckPending { primary, trial },
                )
            }
        };
        if let Some(outcome) = recheck {
            Job::on_complete(this, outcome);
        }
    }

    /// Record the classification, report a mismatch, and remove the job.
    fn finish(
        this: &Rc<RefCell<Job>>,
        classification: Classification,
        primary: VerifyOutcome,
        trial: VerifyOutcome,
    ) {
        let Some(shared) = this.borrow().parent.upgrade() else {
            return;
        };
        let (id, report) = {
            let mut job = this.borrow_mut();
            job.state = JobState::Finished;
            let report = (!classification.is_success())
                .then(|| MismatchReport::new(&job.params, &job.config, primary, trial));
            (job.id, report)
        };
        shared.metrics.record_classification(classification);

        let Some(report) = report else {
            info!(%classification, "trial comparison finished");
            shared.remove_job(id);
            return;
        };

        warn!(
            %classification,
            primary = report.primary.net_code(),
            trial = report.trial.net_code(),
            "trial verification mismatch"
        );
        shared.metrics.reports.inc();
        let sink = Rc::clone(&shared.report_sink);
        let parent = Rc::downgrade(&shared);
        drop(shared);

        sink.report(&report);

        // The sink may have torn down the comparator.
        if let Some(shared) = parent.upgrade() {
            shared.remove_job(id);
        }
    }
}

impl Drop for Job {
    fn drop(&mut self) {
        if !self.state.is_finished() {
            let _enter = self.span.enter();
            debug!(
                state = self.state.as_str(),
                client_waiting = self.client.is_some(),
                "trial job aborted"
            );
        }
    }
}
