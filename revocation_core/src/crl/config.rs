use crate::config::ConfigError;
use crate::config::settings::Settings;
use crate::crl::error::{CrlError, RevokedSnafu, UndeterminedSnafu};
use crate::result::{CertRevocationResult, RevocationStatus};
use std::time::Duration;

/// Default maximum CRL size (10 MB)
pub const DEFAULT_MAX_CRL_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CertRevocationCheckMode {
    #[default]
    Disabled,
    Enabled,
    Advisory,
}

impl CertRevocationCheckMode {
    /// Turns a verdict into accept / reject according to the mode.
    ///
    /// Enabled rejects Revoked and Unknown, Advisory only Revoked.
    pub fn apply(self, result: &CertRevocationResult) -> Result<(), CrlError> {
        match (self, result.status) {
            (CertRevocationCheckMode::Disabled, _) => Ok(()),
            (_, RevocationStatus::Revoked) => RevokedSnafu.fail(),
            (CertRevocationCheckMode::Enabled, RevocationStatus::Unknown) => {
                tracing::warn!(
                    target: "revocation_core::crl",
                    error = ?result.error().map(|e| e.to_string()),
                    "Revocation status could not be determined"
                );
                UndeterminedSnafu.fail()
            }
            (CertRevocationCheckMode::Advisory, RevocationStatus::Unknown) => {
                tracing::warn!(
                    target: "revocation_core::crl",
                    "Revocation status could not be determined; allowing due to advisory mode"
                );
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrlConfig {
    pub check_mode: CertRevocationCheckMode,
    pub http_timeout: Duration,
    pub connection_timeout: Duration,
    pub max_crl_size: usize,
    /// Follow the freshest CRL extension of a base CRL to its delta CRL.
    pub fetch_delta_crl: bool,
}

impl Default for CrlConfig {
    fn default() -> Self {
        Self {
            check_mode: CertRevocationCheckMode::Disabled,
            http_timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            max_crl_size: DEFAULT_MAX_CRL_SIZE,
            fetch_delta_crl: true,
        }
    }
}

impl CrlConfig {
    pub fn from_settings(settings: &dyn Settings) -> Result<Self, ConfigError> {
        let check_mode = match settings.get_string("crl_check_mode").as_deref() {
            Some("0") | Some("DISABLED") | None => CertRevocationCheckMode::Disabled,
            Some("1") | Some("ENABLED") => CertRevocationCheckMode::Enabled,
            Some("2") | Some("ADVISORY") => CertRevocationCheckMode::Advisory,
            Some(other) => {
                tracing::warn!("Unknown crl_check_mode: {other}, using DISABLED");
                CertRevocationCheckMode::Disabled
            }
        };
        let http_timeout = seconds(settings, "crl_http_timeout")?.unwrap_or(Duration::from_secs(30));
        let connection_timeout =
            seconds(settings, "crl_connection_timeout")?.unwrap_or(Duration::from_secs(10));
        let max_crl_size = match settings.get_int("crl_max_size") {
            Some(size) => usize::try_from(size).map_err(|_| {
                ConfigError::InvalidArgument(format!("crl_max_size must be positive, got {size}"))
            })?,
            None => DEFAULT_MAX_CRL_SIZE,
        };
        let fetch_delta_crl = settings
            .get_string("crl_fetch_delta")
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(true);
        Ok(Self {
            check_mode,
            http_timeout,
            connection_timeout,
            max_crl_size,
            fetch_delta_crl,
        })
    }
}

fn seconds(settings: &dyn Settings, key: &str) -> Result<Option<Duration>, ConfigError> {
    settings
        .get_int(key)
        .map(|secs| {
            u64::try_from(secs)
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidArgument(format!("{key} must not be negative")))
        })
        .transpose()
}
