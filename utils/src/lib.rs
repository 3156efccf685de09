//! Shared utilities for certcmp.

pub mod logging;

pub use logging::{init_logging, LogFormat};
