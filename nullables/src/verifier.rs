//! Nullable verifier with scripted outcomes and controllable completion.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use certcmp_types::{
    CertChain, CertError, CertStatus, VerifierConfig, VerifyOutcome, VerifyParams, VerifyResult,
};
use certcmp_verification::{Completion, Request, RootStoreUpdate, Verifier, VerifyCallback};

struct PendingCompletion {
    id: u64,
    callback: VerifyCallback,
    outcome: VerifyOutcome,
}

#[derive(Default)]
struct State {
    default_outcome: Option<VerifyOutcome>,
    rules: Vec<(Arc<CertChain>, VerifyOutcome)>,
    async_mode: bool,
    config: VerifierConfig,
    config_updates: usize,
    root_store_version: Option<u64>,
    calls: Vec<VerifyParams>,
    pending: VecDeque<PendingCompletion>,
    next_id: u64,
    cancelled: usize,
}

/// A deterministic verifier for testing.
///
/// Clones share state, so a test keeps one clone and gives another to the
/// code under test. Without any scripted outcome every verification fails
/// with [`CertError::Invalid`].
#[derive(Clone, Default)]
pub struct NullVerifier {
    state: Rc<RefCell<State>>,
}

impl NullVerifier {
    /// A verifier that completes synchronously.
    pub fn new() -> Self {
        Self::default()
    }

    /// A verifier that holds every completion until released.
    pub fn new_async() -> Self {
        let verifier = Self::new();
        verifier.set_async(true);
        verifier
    }

    /// Switch between synchronous and held completion.
    pub fn set_async(&self, async_mode: bool) {
        self.state.borrow_mut().async_mode = async_mode;
    }

    /// Outcome for requests no chain rule matches.
    pub fn respond_with(&self, outcome: VerifyOutcome) {
        self.state.borrow_mut().default_outcome = Some(outcome);
    }

    /// Outcome for requests whose certificate is structurally equal to
    /// `chain`. Takes precedence over [`NullVerifier::respond_with`].
    pub fn respond_for_chain(&self, chain: Arc<CertChain>, outcome: VerifyOutcome) {
        self.state.borrow_mut().rules.push((chain, outcome));
    }

    /// Release the oldest held completion. Returns false if none was held.
    pub fn complete_next(&self) -> bool {
        // The callback may call back into this verifier.
        let next = self.state.borrow_mut().pending.pop_front();
        match next {
            Some(p) => {
                (p.callback)(p.outcome);
                true
            }
            None => false,
        }
    }

    /// Release held completions until none remain, including any queued by
    /// the callbacks themselves. Returns how many ran.
    pub fn complete_all(&self) -> usize {
        let mut count = 0;
        while self.complete_next() {
            count += 1;
        }
        count
    }

    /// Number of completions currently held.
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Number of held completions dropped by cancellation.
    pub fn cancelled_count(&self) -> usize {
        self.state.borrow().cancelled
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<VerifyParams> {
        self.state.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    /// Configuration most recently applied via [`Verifier::set_config`].
    pub fn config(&self) -> VerifierConfig {
        self.state.borrow().config
    }

    /// Number of [`Verifier::set_config`] calls received.
    pub fn config_updates(&self) -> usize {
        self.state.borrow().config_updates
    }

    /// Version of the last root store update received.
    pub fn root_store_version(&self) -> Option<u64> {
        self.state.borrow().root_store_version
    }

    fn outcome_for(state: &State, params: &VerifyParams) -> VerifyOutcome {
        state
            .rules
            .iter()
            .find(|(chain, _)| chain.structurally_equal(params.certificate()))
            .map(|(_, outcome)| outcome.clone())
            .or_else(|| state.default_outcome.clone())
            .unwrap_or_else(|| {
                VerifyOutcome::err(
                    CertError::Invalid,
                    VerifyResult::new(Arc::clone(params.certificate()))
                        .with_status(CertStatus::INVALID),
                )
            })
    }
}

impl Verifier for NullVerifier {
    fn verify(&self, params: &VerifyParams, on_complete: VerifyCallback) -> Completion {
        let mut state = self.state.borrow_mut();
        state.calls.push(params.clone());
        let outcome = Self::outcome_for(&state, params);

        if !state.async_mode {
            return Completion::Ready(outcome);
        }

        let id = state.next_id;
        state.next_id += 1;
        state.pending.push_back(PendingCompletion {
            id,
            callback: on_complete,
            outcome,
        });
        Completion::Pending(Box::new(NullRequest {
            id,
            state: Rc::downgrade(&self.state),
        }))
    }

    fn set_config(&self, config: &VerifierConfig) {
        let mut state = self.state.borrow_mut();
        state.config = *config;
        state.config_updates += 1;
    }

    fn update_root_store(&self, update: &RootStoreUpdate) {
        self.state.borrow_mut().root_store_version = Some(update.version);
    }
}

/// Cancels its held completion when dropped.
struct NullRequest {
    id: u64,
    state: Weak<RefCell<State>>,
}

impl Request for NullRequest {}

impl Drop for NullRequest {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let removed = {
            let mut state = state.borrow_mut();
            let pos = state.pending.iter().position(|p| p.id == self.id);
            let removed = pos.and_then(|pos| state.pending.remove(pos));
            if removed.is_some() {
                state.cancelled += 1;
            }
            removed
        };
        // Dropped outside the borrow: the callback may own values whose
        // destructors reach back into this verifier.
        drop(removed);
    }
}
