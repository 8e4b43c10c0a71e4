use crate::crl::error::{
    CancelledSnafu, CrlDownloadSnafu, CrlError, CrlNotSupportedSnafu, CrlValidationSnafu,
    FreshestCrlUnsupportedSnafu, MissingFetcherSnafu, RevocationCheckSnafu,
};
use crate::crl::extensions::{OID_FRESHEST_CRL, find_extension_by_oid};
use crate::crl::fetcher::Fetcher;
use crate::crl::resolver::check_revocation;
use crate::crl::types::Certificate;
use crate::crl::validator::validate_bundle;
use crate::result::{CertRevocationResult, RevocationStatus, ServerResult};
use chrono::{DateTime, Utc};
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;

/// Inputs for [`cert_check_status`] besides the certificates themselves.
#[derive(Clone, Copy, Default)]
pub struct CertCheckStatusOptions<'a> {
    pub fetcher: Option<&'a dyn Fetcher>,
    /// Compared with entry invalidity dates; `None` disables the comparison.
    pub signing_time: Option<DateTime<Utc>>,
}

/// Whether the certificate names any CRL distribution point.
pub fn is_supported(cert: &Certificate) -> bool {
    !cert.crl_distribution_points.is_empty()
}

/// Checks the revocation status of `cert` against the CRLs of every
/// distribution point it lists.
///
/// Distribution points are visited in order. A Revoked verdict is returned
/// as soon as it is found. Any error stops the walk and yields Unknown,
/// discarding results gathered from earlier distribution points.
pub async fn cert_check_status(
    cancel: &CancellationToken,
    cert: &Certificate,
    issuer: &Certificate,
    opts: CertCheckStatusOptions<'_>,
) -> CertRevocationResult {
    if !is_supported(cert) {
        return CertRevocationResult::crl(
            RevocationStatus::NotApplicable,
            vec![ServerResult::crl_error(
                RevocationStatus::NotApplicable,
                None,
                CrlNotSupportedSnafu.build(),
            )],
        );
    }

    let Some(fetcher) = opts.fetcher else {
        return CertRevocationResult::crl(
            RevocationStatus::Unknown,
            vec![ServerResult::crl_error(
                RevocationStatus::Unknown,
                None,
                MissingFetcherSnafu.build(),
            )],
        );
    };

    let has_freshest_crl_in_certificate =
        find_extension_by_oid(&cert.extensions, &OID_FRESHEST_CRL).is_some();

    // A distribution point does not say which revocation reasons its CRL
    // covers, so every one of them is consulted to avoid missing partial CRLs.
    let mut server_results = Vec::with_capacity(cert.crl_distribution_points.len());
    for crl_url in &cert.crl_distribution_points {
        tracing::debug!(target: "revocation_core::crl", url = %crl_url, "Checking CRL distribution point");
        match check_distribution_point(
            cancel,
            fetcher,
            cert,
            issuer,
            crl_url,
            has_freshest_crl_in_certificate,
            opts.signing_time,
        )
        .await
        {
            Ok(result) if result.status == RevocationStatus::Revoked => {
                tracing::info!(
                    target: "revocation_core::crl",
                    url = %crl_url,
                    serial = %cert.serial_number,
                    "Certificate is revoked"
                );
                return CertRevocationResult::crl(RevocationStatus::Revoked, vec![result]);
            }
            Ok(result) => server_results.push(result),
            Err(e) => {
                tracing::warn!(
                    target: "revocation_core::crl",
                    url = %crl_url,
                    error = %e,
                    "CRL check failed; revocation status is unknown"
                );
                return CertRevocationResult::crl(
                    RevocationStatus::Unknown,
                    vec![ServerResult::crl_error(
                        RevocationStatus::Unknown,
                        Some(crl_url),
                        e,
                    )],
                );
            }
        }
    }

    CertRevocationResult::crl(RevocationStatus::Ok, server_results)
}

async fn check_distribution_point(
    cancel: &CancellationToken,
    fetcher: &dyn Fetcher,
    cert: &Certificate,
    issuer: &Certificate,
    crl_url: &str,
    has_freshest_crl_in_certificate: bool,
    signing_time: Option<DateTime<Utc>>,
) -> Result<ServerResult, CrlError> {
    let bundle = tokio::select! {
        biased;
        _ = cancel.cancelled() => return CancelledSnafu { url: crl_url }.fail(),
        bundle = fetcher.fetch(cancel, crl_url) => bundle.context(CrlDownloadSnafu { url: crl_url })?,
    };

    if has_freshest_crl_in_certificate && bundle.delta_crl.is_none() {
        // Only the certificate points at a delta CRL. Delta CRLs may have a
        // different scope than the base CRL found here, so this combination
        // is rejected.
        return FreshestCrlUnsupportedSnafu.fail();
    }

    validate_bundle(&bundle, issuer).context(CrlValidationSnafu { url: crl_url })?;

    check_revocation(cert, &bundle, signing_time, crl_url)
        .context(RevocationCheckSnafu { url: crl_url })
}
