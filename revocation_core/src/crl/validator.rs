use crate::crl::error::{
    BaseCrlInvalidSnafu, CrlError, CrlExpiredSnafu, DeltaCrlIndicatorExceedsBaseSnafu,
    DeltaCrlIndicatorMissingSnafu, DeltaCrlInvalidSnafu, DeltaCrlNumberNotGreaterSnafu,
    NextUpdateMissingSnafu, UnsupportedCrlExtensionSnafu,
};
use crate::crl::extensions::{
    OID_DELTA_CRL_INDICATOR, OID_ISSUING_DISTRIBUTION_POINT, find_extension_by_oid,
    parse_delta_crl_indicator,
};
use crate::crl::signature::verify_crl_signature;
use crate::crl::types::{Bundle, Certificate, RevocationList};
use chrono::Utc;
use snafu::{OptionExt, ResultExt};

/// Validates the base CRL and, when present, the delta CRL of a bundle
/// against each other (RFC 5280, Section 5.2.4).
pub fn validate_bundle(bundle: &Bundle, issuer: &Certificate) -> Result<(), CrlError> {
    let base_crl = &bundle.base_crl;
    validate_crl(base_crl, issuer).context(BaseCrlInvalidSnafu)?;

    let Some(delta_crl) = &bundle.delta_crl else {
        return Ok(());
    };
    validate_crl(delta_crl, issuer).context(DeltaCrlInvalidSnafu)?;

    if delta_crl.number <= base_crl.number {
        return DeltaCrlNumberNotGreaterSnafu {
            delta: delta_crl.number.clone(),
            base: base_crl.number.clone(),
        }
        .fail();
    }

    let indicator = find_extension_by_oid(&delta_crl.extensions, &OID_DELTA_CRL_INDICATOR)
        .context(DeltaCrlIndicatorMissingSnafu)?;
    let minimum_base_crl_number = parse_delta_crl_indicator(indicator)?;
    if minimum_base_crl_number > base_crl.number {
        return DeltaCrlIndicatorExceedsBaseSnafu {
            indicator: minimum_base_crl_number,
            base: base_crl.number.clone(),
        }
        .fail();
    }
    Ok(())
}

/// Checks signature, freshness and extension criticality of a single CRL.
pub fn validate_crl(crl: &RevocationList, issuer: &Certificate) -> Result<(), CrlError> {
    verify_crl_signature(crl, issuer)?;

    let next_update = crl.next_update.context(NextUpdateMissingSnafu)?;
    let now = Utc::now();
    if now > next_update {
        return CrlExpiredSnafu { now, next_update }.fail();
    }

    for ext in &crl.extensions {
        if ext.oid == OID_ISSUING_DISTRIBUTION_POINT {
            // Scope is not narrowed here; every distribution point of the
            // certificate is checked.
            continue;
        }
        if ext.oid == OID_DELTA_CRL_INDICATOR {
            // checked in validate_bundle
            continue;
        }
        if ext.critical {
            return UnsupportedCrlExtensionSnafu {
                oid: ext.oid.to_string(),
            }
            .fail();
        }
    }
    Ok(())
}
