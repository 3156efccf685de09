//! Certificate verification error codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CertStatus;

/// The reason a verifier rejected a certificate.
///
/// A successful verification carries no error at all; see
/// [`crate::VerifyOutcome`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum CertError {
    #[error("certificate common name does not match the host")]
    CommonNameInvalid,

    #[error("certificate is expired or not yet valid")]
    DateInvalid,

    #[error("certificate is not issued by a trusted authority")]
    AuthorityInvalid,

    #[error("certificate contains errors")]
    ContainsErrors,

    #[error("certificate has no revocation mechanism")]
    NoRevocationMechanism,

    #[error("unable to check certificate revocation")]
    UnableToCheckRevocation,

    #[error("certificate has been revoked")]
    Revoked,

    #[error("certificate is invalid")]
    Invalid,

    #[error("certificate is signed with a weak signature algorithm")]
    WeakSignatureAlgorithm,

    #[error("certificate name is not unique")]
    NonUniqueName,

    #[error("certificate contains a weak key")]
    WeakKey,

    #[error("certificate violates name constraints")]
    NameConstraintViolation,

    #[error("certificate validity period is too long")]
    ValidityTooLong,

    #[error("certificate transparency is required")]
    CertificateTransparencyRequired,

    #[error("certificate is a known interception certificate")]
    KnownInterceptionBlocked,
}

impl CertError {
    /// Stable negative integer used in reports and logs.
    pub const fn net_code(self) -> i32 {
        match self {
            Self::CommonNameInvalid => -200,
            Self::DateInvalid => -201,
            Self::AuthorityInvalid => -202,
            Self::ContainsErrors => -203,
            Self::NoRevocationMechanism => -204,
            Self::UnableToCheckRevocation => -205,
            Self::Revoked => -206,
            Self::Invalid => -207,
            Self::WeakSignatureAlgorithm => -208,
            Self::NonUniqueName => -210,
            Self::WeakKey => -211,
            Self::NameConstraintViolation => -212,
            Self::ValidityTooLong => -213,
            Self::CertificateTransparencyRequired => -214,
            Self::KnownInterceptionBlocked => -217,
        }
    }

    /// Inverse of [`CertError::net_code`].
    pub const fn from_net_code(code: i32) -> Option<Self> {
        Some(match code {
            -200 => Self::CommonNameInvalid,
            -201 => Self::DateInvalid,
            -202 => Self::AuthorityInvalid,
            -203 => Self::ContainsErrors,
            -204 => Self::NoRevocationMechanism,
            -205 => Self::UnableToCheckRevocation,
            -206 => Self::Revoked,
            -207 => Self::Invalid,
            -208 => Self::WeakSignatureAlgorithm,
            -210 => Self::NonUniqueName,
            -211 => Self::WeakKey,
            -212 => Self::NameConstraintViolation,
            -213 => Self::ValidityTooLong,
            -214 => Self::CertificateTransparencyRequired,
            -217 => Self::KnownInterceptionBlocked,
            _ => return None,
        })
    }

    /// The status bit a verifier sets when it reports this error.
    pub const fn status_bit(self) -> CertStatus {
        match self {
            Self::CommonNameInvalid => CertStatus::COMMON_NAME_INVALID,
            Self::DateInvalid => CertStatus::DATE_INVALID,
            Self::AuthorityInvalid => CertStatus::AUTHORITY_INVALID,
            Self::ContainsErrors | Self::Invalid => CertStatus::INVALID,
            Self::NoRevocationMechanism => CertStatus::NO_REVOCATION_MECHANISM,
            Self::UnableToCheckRevocation => CertStatus::UNABLE_TO_CHECK_REVOCATION,
            Self::Revoked => CertStatus::REVOKED,
            Self::WeakSignatureAlgorithm => CertStatus::WEAK_SIGNATURE_ALGORITHM,
            Self::NonUniqueName => CertStatus::NON_UNIQUE_NAME,
            Self::WeakKey => CertStatus::WEAK_KEY,
            Self::NameConstraintViolation => CertStatus::NAME_CONSTRAINT_VIOLATION,
            Self::ValidityTooLong => CertStatus::VALIDITY_TOO_LONG,
            Self::CertificateTransparencyRequired => CertStatus::CT_COMPLIANCE_FAILED,
            Self::KnownInterceptionBlocked => CertStatus::KNOWN_INTERCEPTION_BLOCKED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CertError; 15] = [
        CertError::CommonNameInvalid,
        CertError::DateInvalid,
        CertError::AuthorityInvalid,
        CertError::ContainsErrors,
        CertError::NoRevocationMechanism,
        CertError::UnableToCheckRevocation,
        CertError::Revoked,
        CertError::Invalid,
        CertError::WeakSignatureAlgorithm,
        CertError::NonUniqueName,
        CertError::WeakKey,
        CertError::NameConstraintViolation,
        CertError::ValidityTooLong,
        CertError::CertificateTransparencyRequired,
        CertError::KnownInterceptionBlocked,
    ];

    #[test]
    fn net_codes_are_unique_and_reversible() {
        for e in ALL {
            assert_eq!(CertError::from_net_code(e.net_code()), Some(e));
        }
        let mut codes: Vec<i32> = ALL.iter().map(|e| e.net_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(CertError::from_net_code(0), None);
        assert_eq!(CertError::from_net_code(-209), None);
    }

    #[test]
    fn revoked_maps_to_revoked_bit() {
        assert_eq!(CertError::Revoked.status_bit(), CertStatus::REVOKED);
    }
}
