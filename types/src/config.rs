//! Verifier configuration.

use serde::{Deserialize, Serialize};

/// Policy switches shared by every verifier a comparator owns.
///
/// Specialised verifiers layer overrides on a copy rather than keeping their
/// own settings; see [`VerifierConfig::with_forced_revocation`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Check revocation status for every chain.
    #[serde(default)]
    pub enable_rev_checking: bool,

    /// Require revocation checking for chains that end in a locally added
    /// trust anchor.
    #[serde(default)]
    pub require_rev_checking_local_anchors: bool,

    /// Accept SHA-1 signatures on chains that end in a locally added anchor.
    #[serde(default)]
    pub allow_weak_legacy_roots: bool,

    /// Reject chains issued by known-weak certificate authorities.
    #[serde(default)]
    pub disallow_known_weak_cas: bool,
}

impl VerifierConfig {
    /// A copy of this configuration with revocation checking forced on.
    pub fn with_forced_revocation(&self) -> Self {
        Self {
            enable_rev_checking: true,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_revocation_only_touches_rev_checking() {
        let base = VerifierConfig {
            enable_rev_checking: false,
            require_rev_checking_local_anchors: true,
            allow_weak_legacy_roots: true,
            disallow_known_weak_cas: false,
        };
        let forced = base.with_forced_revocation();
        assert!(forced.enable_rev_checking);
        assert_eq!(
            VerifierConfig {
                enable_rev_checking: false,
                ..forced
            },
            base
        );
    }
}
