//! Verification request parameters.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::CertChain;

/// Per-request behaviour flags passed through to every verifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerifyFlags(u32);

impl VerifyFlags {
    pub const NONE: Self = Self(0);
    /// Verifiers must not fetch intermediates or revocation data.
    pub const DISABLE_NETWORK_FETCHES: Self = Self(1 << 4);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// An immutable verification request.
///
/// Every verifier a comparison job calls receives these same parameters,
/// except the path-divergence recheck, which receives a copy re-targeted at
/// another chain via [`VerifyParams::with_certificate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyParams {
    hostname: String,
    certificate: Arc<CertChain>,
    ocsp_response: Vec<u8>,
    sct_list: Vec<u8>,
    flags: VerifyFlags,
}

impl VerifyParams {
    pub fn new(
        certificate: Arc<CertChain>,
        hostname: impl Into<String>,
        flags: VerifyFlags,
        ocsp_response: Vec<u8>,
        sct_list: Vec<u8>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            certificate,
            ocsp_response,
            sct_list,
            flags,
        }
    }

    /// A request for `hostname` with no stapled OCSP or SCT data.
    pub fn for_host(certificate: Arc<CertChain>, hostname: impl Into<String>) -> Self {
        Self::new(certificate, hostname, VerifyFlags::NONE, Vec::new(), Vec::new())
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn certificate(&self) -> &Arc<CertChain> {
        &self.certificate
    }

    pub fn ocsp_response(&self) -> &[u8] {
        &self.ocsp_response
    }

    pub fn sct_list(&self) -> &[u8] {
        &self.sct_list
    }

    pub fn flags(&self) -> VerifyFlags {
        self.flags
    }

    /// The same request, but validating `certificate` instead.
    pub fn with_certificate(&self, certificate: Arc<CertChain>) -> Self {
        Self {
            certificate,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Certificate;

    #[test]
    fn with_certificate_keeps_everything_else() {
        let a = Arc::new(CertChain::leaf_only(Certificate::from_der(vec![1])));
        let b = Arc::new(CertChain::leaf_only(Certificate::from_der(vec![2])));
        let params = VerifyParams::new(
            a,
            "example.test",
            VerifyFlags::DISABLE_NETWORK_FETCHES,
            vec![9, 9],
            vec![7],
        );
        let retargeted = params.with_certificate(Arc::clone(&b));
        assert!(Arc::ptr_eq(retargeted.certificate(), &b));
        assert_eq!(retargeted.hostname(), "example.test");
        assert_eq!(retargeted.ocsp_response(), &[9, 9]);
        assert_eq!(retargeted.sct_list(), &[7]);
        assert!(retargeted
            .flags()
            .contains(VerifyFlags::DISABLE_NETWORK_FETCHES));
    }
}
