//! Known-benign differences between primary and trial outcomes.

use certcmp_types::{chains_structurally_equal, CertError, CertStatus, VerifyOutcome};

use crate::IgnoredReason;

/// Decides, without running any further verification, whether a difference
/// between two outcomes has a known benign explanation.
pub trait IgnorabilityPolicy {
    /// `None` means the difference is not ignorable.
    fn classify(
        &self,
        primary: &VerifyOutcome,
        trial: &VerifyOutcome,
        allow_weak_legacy_roots: bool,
    ) -> Option<IgnoredReason>;
}

impl<F> IgnorabilityPolicy for F
where
    F: Fn(&VerifyOutcome, &VerifyOutcome, bool) -> Option<IgnoredReason>,
{
    fn classify(
        &self,
        primary: &VerifyOutcome,
        trial: &VerifyOutcome,
        allow_weak_legacy_roots: bool,
    ) -> Option<IgnoredReason> {
        self(primary, trial, allow_weak_legacy_roots)
    }
}

/// Default rule set. Rules are tried in order; the first match wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticIgnorability;

impl IgnorabilityPolicy for StaticIgnorability {
    fn classify(
        &self,
        primary: &VerifyOutcome,
        trial: &VerifyOutcome,
        allow_weak_legacy_roots: bool,
    ) -> Option<IgnoredReason> {
        if primary.error == Some(CertError::AuthorityInvalid)
            && trial.error == Some(CertError::AuthorityInvalid)
        {
            return Some(IgnoredReason::BothAuthorityInvalid);
        }

        if primary.is_ok() {
            let p = &primary.result;

            if allow_weak_legacy_roots
                && trial.error == Some(CertError::WeakSignatureAlgorithm)
                && p.cert_status.contains(CertStatus::SHA1_SIGNATURE_PRESENT)
                && !p.is_issued_by_known_root
            {
                return Some(IgnoredReason::Sha1SignaturePresent);
            }

            if trial.error == Some(CertError::AuthorityInvalid)
                && p.verified_chain.len() == 1
                && !p.is_issued_by_known_root
            {
                return Some(IgnoredReason::LocallyTrustedLeaf);
            }
        }

        if primary.error == trial.error
            && chains_structurally_equal(&primary.result, &trial.result)
            && primary
                .result
                .cert_status
                .difference(trial.result.cert_status)
                == CertStatus::IS_EV
        {
            return Some(IgnoredReason::MultipleEvPoliciesAndOneMatchesRoot);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certcmp_types::{CertChain, Certificate, VerifyResult};
    use std::sync::Arc;

    fn chain(len: u8) -> Arc<CertChain> {
        let leaf = Certificate::from_der(vec![0xaa]);
        let inter = (1..len).map(|i| Certificate::from_der(vec![i])).collect();
        Arc::new(CertChain::new(leaf, inter))
    }

    fn ok(len: u8, status: CertStatus) -> VerifyOutcome {
        VerifyOutcome::ok(VerifyResult::new(chain(len)).with_status(status))
    }

    fn err(e: CertError, len: u8) -> VerifyOutcome {
        VerifyOutcome::err(e, VerifyResult::new(chain(len)).with_status(e.status_bit()))
    }

    #[test]
    fn both_authority_invalid() {
        let p = err(CertError::AuthorityInvalid, 2);
        let t = err(CertError::AuthorityInvalid, 3);
        assert_eq!(
            StaticIgnorability.classify(&p, &t, false),
            Some(IgnoredReason::BothAuthorityInvalid)
        );
    }

    #[test]
    fn sha1_needs_weak_roots_allowed() {
        let p = ok(3, CertStatus::SHA1_SIGNATURE_PRESENT);
        let t = err(CertError::WeakSignatureAlgorithm, 3);
        assert_eq!(
            StaticIgnorability.classify(&p, &t, true),
            Some(IgnoredReason::Sha1SignaturePresent)
        );
        assert_eq!(StaticIgnorability.classify(&p, &t, false), None);
    }

    #[test]
    fn sha1_on_known_root_is_not_ignorable() {
        let mut p = ok(3, CertStatus::SHA1_SIGNATURE_PRESENT);
        p.result.is_issued_by_known_root = true;
        let t = err(CertError::WeakSignatureAlgorithm, 3);
        assert_eq!(StaticIgnorability.classify(&p, &t, true), None);
    }

    #[test]
    fn locally_trusted_leaf() {
        let p = ok(1, CertStatus::NONE);
        let t = err(CertError::AuthorityInvalid, 1);
        assert_eq!(
            StaticIgnorability.classify(&p, &t, false),
            Some(IgnoredReason::LocallyTrustedLeaf)
        );

        let longer = ok(2, CertStatus::NONE);
        assert_eq!(StaticIgnorability.classify(&longer, &t, false), None);
    }

    #[test]
    fn ev_only_difference() {
        let p = ok(3, CertStatus::IS_EV);
        let t = ok(3, CertStatus::NONE);
        assert_eq!(
            StaticIgnorability.classify(&p, &t, false),
            Some(IgnoredReason::MultipleEvPoliciesAndOneMatchesRoot)
        );

        let other_bits = ok(3, CertStatus::IS_EV | CertStatus::REV_CHECKING_ENABLED);
        assert_eq!(StaticIgnorability.classify(&other_bits, &t, false), None);
    }

    #[test]
    fn valid_versus_revoked_is_not_ignorable() {
        let p = ok(3, CertStatus::NONE);
        let t = err(CertError::Revoked, 3);
        assert_eq!(StaticIgnorability.classify(&p, &t, true), None);
    }

    #[test]
    fn closures_are_policies() {
        let always = |_: &VerifyOutcome, _: &VerifyOutcome, _: bool| {
            Some(IgnoredReason::LocallyTrustedLeaf)
        };
        let p = ok(3, CertStatus::NONE);
        assert_eq!(
            always.classify(&p, &p, false),
            Some(IgnoredReason::LocallyTrustedLeaf)
        );
    }
}
