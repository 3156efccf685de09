//! Verification results.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{CertChain, CertError, CertStatus};

/// Details of a completed verification.
///
/// Equality is structural: two results built over distinct but identical
/// chain allocations compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    /// The chain the verifier built, leaf first.
    pub verified_chain: Arc<CertChain>,
    pub cert_status: CertStatus,
    /// Whether the chain terminates in a publicly known root rather than a
    /// locally added anchor.
    pub is_issued_by_known_root: bool,
    /// SHA-256 hashes of the SubjectPublicKeyInfo of each chain element.
    pub public_key_hashes: Vec<[u8; 32]>,
}

impl VerifyResult {
    /// An empty result over `chain`, as a verifier starts out before it has
    /// learned anything.
    pub fn new(chain: Arc<CertChain>) -> Self {
        Self {
            verified_chain: chain,
            cert_status: CertStatus::NONE,
            is_issued_by_known_root: false,
            public_key_hashes: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: CertStatus) -> Self {
        self.cert_status = status;
        self
    }

    pub fn with_known_root(mut self, known_root: bool) -> Self {
        self.is_issued_by_known_root = known_root;
        self
    }
}

/// The error code and result of one verification attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    /// `None` means the certificate verified successfully.
    pub error: Option<CertError>,
    pub result: VerifyResult,
}

impl VerifyOutcome {
    pub fn ok(result: VerifyResult) -> Self {
        Self {
            error: None,
            result,
        }
    }

    pub fn err(error: CertError, result: VerifyResult) -> Self {
        Self {
            error: Some(error),
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Net-error style code: zero for success.
    pub fn net_code(&self) -> i32 {
        self.error.map_or(0, CertError::net_code)
    }

    /// Same error code and structurally equal result.
    pub fn matches(&self, other: &VerifyOutcome) -> bool {
        self.error == other.error && self.result == other.result
    }
}
