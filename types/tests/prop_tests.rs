use proptest::prelude::*;
use std::sync::Arc;

use certcmp_types::{
    chains_structurally_equal, CertChain, CertError, CertStatus, Certificate, VerifyOutcome,
    VerifyResult,
};

fn arb_cert() -> impl Strategy<Value = Certificate> {
    prop::collection::vec(any::<u8>(), 1..16).prop_map(Certificate::from_der)
}

fn arb_chain() -> impl Strategy<Value = CertChain> {
    (arb_cert(), prop::collection::vec(arb_cert(), 0..4))
        .prop_map(|(leaf, intermediates)| CertChain::new(leaf, intermediates))
}

proptest! {
    /// Structural equality ignores allocation identity.
    #[test]
    fn chain_equals_its_rebuilt_copy(chain in arb_chain()) {
        let copy = CertChain::new(chain.leaf().clone(), chain.intermediates().to_vec());
        prop_assert!(chain.structurally_equal(&copy));
        prop_assert!(copy.structurally_equal(&chain));
    }

    /// Structural equality agrees with derived equality on the certificates.
    #[test]
    fn structural_equality_matches_value_equality(a in arb_chain(), b in arb_chain()) {
        prop_assert_eq!(a.structurally_equal(&b), a == b);
        prop_assert_eq!(a.structurally_equal(&b), b.structurally_equal(&a));
    }

    /// Appending an intermediate always breaks equality.
    #[test]
    fn extended_chain_is_never_equal(chain in arb_chain(), extra in arb_cert()) {
        let mut intermediates = chain.intermediates().to_vec();
        intermediates.push(extra);
        let longer = CertChain::new(chain.leaf().clone(), intermediates);
        prop_assert!(!chain.structurally_equal(&longer));
        prop_assert_eq!(longer.len(), chain.len() + 1);
    }

    /// Results over rebuilt chains compare by chain content.
    #[test]
    fn results_compare_chains_structurally(chain in arb_chain()) {
        let a = VerifyResult::new(Arc::new(chain.clone()));
        let b = VerifyResult::new(Arc::new(chain));
        prop_assert!(chains_structurally_equal(&a, &b));
        prop_assert!(VerifyOutcome::ok(a.clone()).matches(&VerifyOutcome::ok(b)));
    }

    /// Fingerprints are stable and 64 hex digits.
    #[test]
    fn fingerprint_hex_is_stable(cert in arb_cert()) {
        let hex = cert.fingerprint_hex();
        prop_assert_eq!(hex.len(), 64);
        prop_assert_eq!(hex, cert.clone().fingerprint_hex());
    }

    /// Status difference is symmetric and empty only for equal sets.
    #[test]
    fn status_difference_is_symmetric(a in any::<u32>(), b in any::<u32>()) {
        let (a, b) = (CertStatus::from_bits(a), CertStatus::from_bits(b));
        prop_assert_eq!(a.difference(b), b.difference(a));
        prop_assert_eq!(a.difference(b).is_empty(), a == b);
    }

    /// Every net code maps back to the error it came from.
    #[test]
    fn net_codes_round_trip(code in -220i32..-190) {
        if let Some(error) = CertError::from_net_code(code) {
            prop_assert_eq!(error.net_code(), code);
        }
    }
}
