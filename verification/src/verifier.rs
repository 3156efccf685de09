//! The certificate verifier contract.
//!
//! How a verifier builds and checks a chain is its own affair. What the
//! comparator relies on is the completion protocol:
//!
//! - [`Verifier::verify`] either finishes on the spot and returns
//!   [`Completion::Ready`], in which case the callback is dropped unused, or it
//!   returns [`Completion::Pending`] and runs the callback exactly once later.
//! - Dropping the [`Request`] from a pending completion cancels it. The
//!   callback must then never run.
//! - A verifier never runs the callback from inside `verify` itself.

use std::sync::Arc;

use certcmp_types::{CertChain, VerifierConfig, VerifyOutcome, VerifyParams};

/// Receives the outcome of a pending verification.
pub type VerifyCallback = Box<dyn FnOnce(VerifyOutcome)>;

/// Handle to an outstanding verification. Dropping it cancels the request.
pub trait Request {}

/// How a call to [`Verifier::verify`] completed.
pub enum Completion {
    /// The verification finished synchronously.
    Ready(VerifyOutcome),
    /// The verification continues in the background; the callback will run
    /// unless the request is dropped first.
    Pending(Box<dyn Request>),
}

impl Completion {
    pub fn is_pending(&self) -> bool {
        matches!(self, Completion::Pending(_))
    }

    /// The outcome, if the verification finished synchronously.
    pub fn ready(self) -> Option<VerifyOutcome> {
        match self {
            Completion::Ready(outcome) => Some(outcome),
            Completion::Pending(_) => None,
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Completion::Ready(outcome) => f.debug_tuple("Ready").field(outcome).finish(),
            Completion::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// A replacement set of trust anchors pushed to running verifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootStoreUpdate {
    /// Monotonic version of the root store data.
    pub version: u64,
    /// Anchors the verifier should trust from now on.
    pub anchors: Vec<Arc<CertChain>>,
}

/// A certificate verification strategy.
///
/// Verifiers are shared by every in-flight comparison and reconfigured in
/// place, hence `&self` throughout.
pub trait Verifier {
    /// Start verifying `params`. See the module docs for the completion
    /// protocol.
    fn verify(&self, params: &VerifyParams, on_complete: VerifyCallback) -> Completion;

    /// Replace the verifier's configuration. Applies to verifications started
    /// afterwards; requests already in flight are unaffected.
    fn set_config(&self, config: &VerifierConfig);

    /// Replace the verifier's root store.
    fn update_root_store(&self, _update: &RootStoreUpdate) {}
}

impl<V: Verifier + ?Sized> Verifier for Box<V> {
    fn verify(&self, params: &VerifyParams, on_complete: VerifyCallback) -> Completion {
        (**self).verify(params, on_complete)
    }

    fn set_config(&self, config: &VerifierConfig) {
        (**self).set_config(config)
    }

    fn update_root_store(&self, update: &RootStoreUpdate) {
        (**self).update_root_store(update)
    }
}
