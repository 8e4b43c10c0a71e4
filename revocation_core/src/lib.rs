//! CRL based revocation checking for X.509 certificates (RFC 5280), with
//! delta CRL support.
//!
//! The entry point is [`crl::cert_check_status`], which walks the CRL
//! distribution points of a certificate, validates each fetched base/delta
//! CRL pair and resolves a [`result::RevocationStatus`].

extern crate tracing;
extern crate tracing_subscriber;

pub mod config;
pub mod crl;
pub mod logging;
pub mod result;
#[cfg(test)]
mod test_utils;

pub use result::{CertRevocationResult, RevocationMethod, RevocationStatus, ServerResult};
