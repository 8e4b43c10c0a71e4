use crate::crl::error::CrlError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationStatus {
    /// Not revoked at the time of the check (or of signing).
    Ok,
    Revoked,
    /// Status could not be determined.
    Unknown,
    /// The certificate offers no way to check revocation.
    NotApplicable,
}

impl fmt::Display for RevocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RevocationStatus::Ok => "OK",
            RevocationStatus::Revoked => "Revoked",
            RevocationStatus::Unknown => "Unknown",
            RevocationStatus::NotApplicable => "NotApplicable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationMethod {
    Crl,
}

impl fmt::Display for RevocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevocationMethod::Crl => f.write_str("CRL"),
        }
    }
}

/// Outcome of consulting a single distribution point.
#[derive(Debug)]
pub struct ServerResult {
    pub status: RevocationStatus,
    pub server: Option<String>,
    pub error: Option<CrlError>,
    pub method: RevocationMethod,
}

impl ServerResult {
    pub(crate) fn crl(status: RevocationStatus, server: &str) -> Self {
        Self {
            status,
            server: Some(server.to_string()),
            error: None,
            method: RevocationMethod::Crl,
        }
    }

    pub(crate) fn crl_error(
        status: RevocationStatus,
        server: Option<&str>,
        error: CrlError,
    ) -> Self {
        Self {
            status,
            server: server.map(str::to_string),
            error: Some(error),
            method: RevocationMethod::Crl,
        }
    }
}

/// Overall revocation verdict for one certificate.
#[derive(Debug)]
pub struct CertRevocationResult {
    pub status: RevocationStatus,
    pub server_results: Vec<ServerResult>,
    pub method: RevocationMethod,
}

impl CertRevocationResult {
    pub(crate) fn crl(status: RevocationStatus, server_results: Vec<ServerResult>) -> Self {
        Self {
            status,
            server_results,
            method: RevocationMethod::Crl,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.status == RevocationStatus::Revoked
    }

    /// First error reported by any distribution point.
    pub fn error(&self) -> Option<&CrlError> {
        self.server_results.iter().find_map(|r| r.error.as_ref())
    }
}
