//! Certificate status bits reported alongside a verification result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitmask of conditions a verifier observed while validating a chain.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertStatus(u32);

impl CertStatus {
    pub const NONE: Self = Self(0);

    // ── Error-like bits ────────────────────────────────────────────────
    pub const COMMON_NAME_INVALID: Self = Self(1 << 0);
    pub const DATE_INVALID: Self = Self(1 << 1);
    pub const AUTHORITY_INVALID: Self = Self(1 << 2);
    pub const NO_REVOCATION_MECHANISM: Self = Self(1 << 4);
    pub const UNABLE_TO_CHECK_REVOCATION: Self = Self(1 << 5);
    pub const REVOKED: Self = Self(1 << 6);
    pub const INVALID: Self = Self(1 << 7);
    pub const WEAK_SIGNATURE_ALGORITHM: Self = Self(1 << 8);
    pub const NON_UNIQUE_NAME: Self = Self(1 << 10);
    pub const WEAK_KEY: Self = Self(1 << 11);
    pub const NAME_CONSTRAINT_VIOLATION: Self = Self(1 << 13);
    pub const VALIDITY_TOO_LONG: Self = Self(1 << 14);
    pub const CT_COMPLIANCE_FAILED: Self = Self(1 << 20);
    pub const KNOWN_INTERCEPTION_BLOCKED: Self = Self(1 << 21);

    // ── Informational bits ─────────────────────────────────────────────
    pub const IS_EV: Self = Self(1 << 16);
    pub const REV_CHECKING_ENABLED: Self = Self(1 << 17);
    pub const SHA1_SIGNATURE_PRESENT: Self = Self(1 << 19);
    pub const KNOWN_INTERCEPTION_DETECTED: Self = Self(1 << 22);

    const NAMES: &'static [(CertStatus, &'static str)] = &[
        (Self::COMMON_NAME_INVALID, "COMMON_NAME_INVALID"),
        (Self::DATE_INVALID, "DATE_INVALID"),
        (Self::AUTHORITY_INVALID, "AUTHORITY_INVALID"),
        (Self::NO_REVOCATION_MECHANISM, "NO_REVOCATION_MECHANISM"),
        (Self::UNABLE_TO_CHECK_REVOCATION, "UNABLE_TO_CHECK_REVOCATION"),
        (Self::REVOKED, "REVOKED"),
        (Self::INVALID, "INVALID"),
        (Self::WEAK_SIGNATURE_ALGORITHM, "WEAK_SIGNATURE_ALGORITHM"),
        (Self::NON_UNIQUE_NAME, "NON_UNIQUE_NAME"),
        (Self::WEAK_KEY, "WEAK_KEY"),
        (Self::NAME_CONSTRAINT_VIOLATION, "NAME_CONSTRAINT_VIOLATION"),
        (Self::VALIDITY_TOO_LONG, "VALIDITY_TOO_LONG"),
        (Self::IS_EV, "IS_EV"),
        (Self::REV_CHECKING_ENABLED, "REV_CHECKING_ENABLED"),
        (Self::SHA1_SIGNATURE_PRESENT, "SHA1_SIGNATURE_PRESENT"),
        (Self::CT_COMPLIANCE_FAILED, "CT_COMPLIANCE_FAILED"),
        (Self::KNOWN_INTERCEPTION_BLOCKED, "KNOWN_INTERCEPTION_BLOCKED"),
        (Self::KNOWN_INTERCEPTION_DETECTED, "KNOWN_INTERCEPTION_DETECTED"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bits set in exactly one of the two masks.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for CertStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CertStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CertStatus {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for CertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CertStatus({self})")
    }
}

impl fmt::Display for CertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut rest = *self;
        let mut first = true;
        for &(flag, name) in Self::NAMES {
            if rest.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                rest.remove(flag);
                first = false;
            }
        }
        if !rest.is_empty() {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{:#x}", rest.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_and_intersects() {
        let s = CertStatus::REVOKED | CertStatus::REV_CHECKING_ENABLED;
        assert!(s.contains(CertStatus::REVOKED));
        assert!(!s.contains(CertStatus::REVOKED | CertStatus::IS_EV));
        assert!(s.intersects(CertStatus::REVOKED | CertStatus::IS_EV));
        assert!(!s.intersects(CertStatus::IS_EV));
    }

    #[test]
    fn difference_isolates_changed_bits() {
        let a = CertStatus::IS_EV | CertStatus::SHA1_SIGNATURE_PRESENT;
        let b = CertStatus::SHA1_SIGNATURE_PRESENT;
        assert_eq!(a.difference(b), CertStatus::IS_EV);
    }

    #[test]
    fn display_lists_named_bits() {
        let s = CertStatus::REVOKED | CertStatus::IS_EV;
        assert_eq!(s.to_string(), "REVOKED|IS_EV");
        assert_eq!(CertStatus::NONE.to_string(), "NONE");
        assert_eq!(CertStatus::from_bits(1 << 30).to_string(), "0x40000000");
    }
}
