//! Classification of primary/trial outcome pairs.
//!
//! These are pure functions of the outcomes and the job's configuration; the
//! job state machine decides what to run next from the returned [`Decision`].

use certcmp_types::{chains_structurally_equal, CertError, CertStatus, VerifierConfig, VerifyOutcome};
use certcmp_verification::{Classification, IgnorabilityPolicy, IgnoredReason, MismatchKind};

/// What a job does after comparing the primary and trial outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Done; no further verification needed.
    Finish(Classification),
    /// Re-run the trial with revocation checking forced on.
    RecheckRevocation,
    /// Re-run the primary verifier against the chain the trial built.
    ReverifyTrialChain,
}

fn mismatch(primary: &VerifyOutcome, trial: &VerifyOutcome) -> Classification {
    Classification::Mismatch(MismatchKind::from_outcomes(primary.is_ok(), trial.is_ok()))
}

/// The primary verifier reported a revocation nobody asked it to check for,
/// and the trial verifier did not check revocation at all.
fn is_unrequested_revocation(
    primary: &VerifyOutcome,
    trial: &VerifyOutcome,
    config: &VerifierConfig,
) -> bool {
    primary.error == Some(CertError::Revoked)
        && !config.enable_rev_checking
        && !primary
            .result
            .cert_status
            .contains(CertStatus::REV_CHECKING_ENABLED)
        && !trial
            .result
            .cert_status
            .intersects(CertStatus::REVOKED | CertStatus::REV_CHECKING_ENABLED)
}

/// Compare the initial primary and trial outcomes.
///
/// Branches are tried in a fixed order and the first that applies wins. A
/// configuration change while the job was in flight finishes the job in
/// place of either recheck. Static ignorability and plain mismatches are
/// classified as usual.
pub(crate) fn after_trial(
    primary: &VerifyOutcome,
    trial: &VerifyOutcome,
    config: &VerifierConfig,
    config_changed: bool,
    policy: &dyn IgnorabilityPolicy,
) -> Decision {
    if primary.matches(trial) {
        return Decision::Finish(Classification::Equal);
    }

    let config_changed_finish =
        Decision::Finish(Classification::Ignored(IgnoredReason::ConfigurationChanged));

    if is_unrequested_revocation(primary, trial, config) {
        if config_changed {
            return config_changed_finish;
        }
        return Decision::RecheckRevocation;
    }

    if let Some(reason) = policy.classify(primary, trial, config.allow_weak_legacy_roots) {
        return Decision::Finish(Classification::Ignored(reason));
    }

    if !chains_structurally_equal(&primary.result, &trial.result)
        && (trial.is_ok() || !primary.is_ok())
    {
        if config_changed {
            return config_changed_finish;
        }
        return Decision::ReverifyTrialChain;
    }

    Decision::Finish(mismatch(primary, trial))
}

/// Classify after the trial verifier re-ran with revocation checking forced.
///
/// The mismatch taxonomy uses the original outcomes, not the recheck.
pub(crate) fn after_revocation_recheck(
    primary: &VerifyOutcome,
    trial: &VerifyOutcome,
    recheck: &VerifyOutcome,
) -> Classification {
    if recheck.error == Some(CertError::Revoked) {
        return Classification::Ignored(IgnoredReason::PlatformForcedRevocation);
    }
    mismatch(primary, trial)
}

/// Classify after the primary verifier re-ran against the trial's chain.
pub(crate) fn after_path_recheck(
    primary: &VerifyOutcome,
    trial: &VerifyOutcome,
    recheck: &VerifyOutcome,
    config: &VerifierConfig,
    policy: &dyn IgnorabilityPolicy,
) -> Classification {
    let equivalent = recheck.matches(trial)
        || policy
            .classify(recheck, trial, config.allow_weak_legacy_roots)
            .is_some();
    if equivalent {
        return Classification::Ignored(IgnoredReason::DifferentPathReverifiesEquivalent);
    }
    mismatch(primary, trial)
}
