//! Fundamental types for trial certificate-verification comparison.
//!
//! This crate defines the data exchanged between a caller, the verifiers being
//! compared, and the comparator: certificates and chains, request parameters,
//! verification results, error codes, status bits, and verifier configuration.

pub mod cert;
pub mod config;
pub mod error;
pub mod params;
pub mod result;
pub mod status;

pub use cert::{chains_structurally_equal, CertChain, Certificate};
pub use config::VerifierConfig;
pub use error::CertError;
pub use params::{VerifyFlags, VerifyParams};
pub use result::{VerifyOutcome, VerifyResult};
pub use status::CertStatus;
