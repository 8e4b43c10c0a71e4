use crate::crl::error::CrlError;
use crate::crl::extensions::parse_entry_extensions;
use crate::crl::types::{Bundle, Certificate, ReasonCode, RevocationEntry};
use crate::result::{RevocationStatus, ServerResult};
use chrono::{DateTime, Utc};

/// Decides whether `cert` is revoked according to an already validated bundle.
///
/// Entries are walked base first, then delta. An entry whose invalidity date
/// is after `signing_time` ends the walk with OK. Any reason other than
/// certificateHold or removeFromCRL ends it with Revoked. Otherwise the most
/// recent hold/remove entry decides.
pub fn check_revocation(
    cert: &Certificate,
    bundle: &Bundle,
    signing_time: Option<DateTime<Utc>>,
    crl_url: &str,
) -> Result<ServerResult, CrlError> {
    // most recent certificateHold or removeFromCRL entry
    let mut latest_temp_entry: Option<&RevocationEntry> = None;

    for entry in bundle
        .entries()
        .filter(|entry| entry.serial_number == cert.serial_number)
    {
        let extensions = parse_entry_extensions(entry)?;

        if let (Some(signing_time), Some(invalidity_date)) =
            (signing_time, extensions.invalidity_date)
            && signing_time < invalidity_date
        {
            // not yet invalid when signed
            return Ok(ServerResult::crl(RevocationStatus::Ok, crl_url));
        }

        if !entry.reason_code.is_temporary() {
            return Ok(ServerResult::crl(RevocationStatus::Revoked, crl_url));
        }
        if latest_temp_entry.is_none_or(|latest| latest.revocation_time < entry.revocation_time) {
            latest_temp_entry = Some(entry);
        }
    }

    let status = match latest_temp_entry {
        Some(entry) if entry.reason_code == ReasonCode::CERTIFICATE_HOLD => {
            RevocationStatus::Revoked
        }
        _ => RevocationStatus::Ok,
    };
    Ok(ServerResult::crl(status, crl_url))
}
