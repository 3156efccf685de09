//! DER certificates and the chains verifiers build from them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::VerifyResult;

/// A single DER-encoded certificate.
///
/// Parsing is the business of the verifiers; this type only carries bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Certificate(Vec<u8>);

impl Certificate {
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self(der.into())
    }

    pub fn as_der(&self) -> &[u8] {
        &self.0
    }

    /// SHA-256 over the DER encoding.
    pub fn fingerprint(&self) -> [u8; 32] {
        Sha256::digest(&self.0).into()
    }

    /// Hex form of [`Certificate::fingerprint`], for logs.
    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint())
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Certificate({})", &self.fingerprint_hex()[..16])
    }
}

/// A leaf certificate followed by the intermediates leading to a trust anchor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertChain {
    leaf: Certificate,
    intermediates: Vec<Certificate>,
}

impl CertChain {
    pub fn new(leaf: Certificate, intermediates: Vec<Certificate>) -> Self {
        Self {
            leaf,
            intermediates,
        }
    }

    /// A chain consisting of the leaf alone.
    pub fn leaf_only(leaf: Certificate) -> Self {
        Self::new(leaf, Vec::new())
    }

    pub fn leaf(&self) -> &Certificate {
        &self.leaf
    }

    pub fn intermediates(&self) -> &[Certificate] {
        &self.intermediates
    }

    /// Total number of certificates, leaf included.
    pub fn len(&self) -> usize {
        1 + self.intermediates.len()
    }

    /// Always false; a chain has at least its leaf.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Leaf first, then intermediates in order.
    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        std::iter::once(&self.leaf).chain(self.intermediates.iter())
    }

    /// Compares the leaf and every intermediate byte-for-byte.
    ///
    /// Two chains built independently from the same certificates are equal
    /// even though they are distinct allocations.
    pub fn structurally_equal(&self, other: &CertChain) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Short identifier of the chain for logs: the leaf fingerprint prefix and
    /// the chain length.
    pub fn describe(&self) -> String {
        format!("{}+{}", &self.leaf.fingerprint_hex()[..16], self.intermediates.len())
    }
}

/// Whether two results were verified over the same certificate chain.
pub fn chains_structurally_equal(a: &VerifyResult, b: &VerifyResult) -> bool {
    a.verified_chain.structurally_equal(&b.verified_chain)
}
