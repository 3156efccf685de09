//! How a trial comparison ended.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Final verdict of comparing a primary and a trial outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Same error code and structurally equal results.
    Equal,
    /// The outcomes differ for a known, benign reason. Not reported.
    Ignored(IgnoredReason),
    /// The outcomes differ and nothing explains it. Reported.
    Mismatch(MismatchKind),
}

/// Why a difference between the two outcomes was explained away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoredReason {
    /// The platform verifier checked revocation although it was not asked
    /// to; the trial verifier agrees once revocation checking is forced on.
    PlatformForcedRevocation,
    /// Both chains are valid and only the EV bit differs.
    MultipleEvPoliciesAndOneMatchesRoot,
    /// The verifiers built different chains, and the primary verifier accepts
    /// the trial's chain the same way the trial does.
    DifferentPathReverifiesEquivalent,
    /// The primary verifier trusted the leaf directly as a local anchor.
    LocallyTrustedLeaf,
    /// Configuration changed while the comparison was in flight, so the two
    /// outcomes may reflect different settings.
    ConfigurationChanged,
    /// The primary verifier accepted a SHA-1 chain under the weak legacy
    /// roots policy that the trial verifier does not implement.
    Sha1SignaturePresent,
    /// Neither verifier trusts the issuing authority.
    BothAuthorityInvalid,
}

/// Shape of a genuine mismatch, from which verifier succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MismatchKind {
    BothValidDifferentDetails,
    PrimaryValidTrialError,
    PrimaryErrorTrialValid,
    BothErrorDifferentDetails,
}

impl MismatchKind {
    pub fn from_outcomes(primary_ok: bool, trial_ok: bool) -> Self {
        match (primary_ok, trial_ok) {
            (true, true) => Self::BothValidDifferentDetails,
            (true, false) => Self::PrimaryValidTrialError,
            (false, true) => Self::PrimaryErrorTrialValid,
            (false, false) => Self::BothErrorDifferentDetails,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BothValidDifferentDetails => "both_valid_different_details",
            Self::PrimaryValidTrialError => "primary_valid_trial_error",
            Self::PrimaryErrorTrialValid => "primary_error_trial_valid",
            Self::BothErrorDifferentDetails => "both_error_different_details",
        }
    }
}

impl IgnoredReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlatformForcedRevocation => "ignored_platform_forced_revocation",
            Self::MultipleEvPoliciesAndOneMatchesRoot => {
                "ignored_multiple_ev_policies_and_one_matches_root"
            }
            Self::DifferentPathReverifiesEquivalent => {
                "ignored_different_path_reverifies_equivalent"
            }
            Self::LocallyTrustedLeaf => "ignored_locally_trusted_leaf",
            Self::ConfigurationChanged => "ignored_configuration_changed",
            Self::Sha1SignaturePresent => "ignored_sha1_signature_present",
            Self::BothAuthorityInvalid => "ignored_both_authority_invalid",
        }
    }
}

impl Classification {
    /// False only for genuine mismatches, the one case that gets reported.
    pub fn is_success(self) -> bool {
        !matches!(self, Classification::Mismatch(_))
    }

    /// Label used for metrics and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Equal => "equal",
            Classification::Ignored(reason) => reason.as_str(),
            Classification::Mismatch(kind) => kind.as_str(),
        }
    }

    /// Stable histogram bucket. Zero is reserved for "no classification".
    pub fn code(self) -> u32 {
        match self {
            Classification::Equal => 1,
            Classification::Mismatch(MismatchKind::PrimaryValidTrialError) => 2,
            Classification::Mismatch(MismatchKind::PrimaryErrorTrialValid) => 3,
            Classification::Mismatch(MismatchKind::BothValidDifferentDetails) => 4,
            Classification::Mismatch(MismatchKind::BothErrorDifferentDetails) => 5,
            Classification::Ignored(IgnoredReason::PlatformForcedRevocation) => 6,
            Classification::Ignored(IgnoredReason::MultipleEvPoliciesAndOneMatchesRoot) => 7,
            Classification::Ignored(IgnoredReason::DifferentPathReverifiesEquivalent) => 8,
            Classification::Ignored(IgnoredReason::LocallyTrustedLeaf) => 9,
            Classification::Ignored(IgnoredReason::ConfigurationChanged) => 10,
            Classification::Ignored(IgnoredReason::Sha1SignaturePresent) => 11,
            Classification::Ignored(IgnoredReason::BothAuthorityInvalid) => 12,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
