use crate::crl::error::{
    CertificateParsingSnafu, CrlError, CrlNumberParseSnafu, CrlParsingSnafu, InvalidTimeSnafu,
    MalformedOidSnafu, PublicKeyParseSnafu,
};
use crate::crl::extensions::{OID_CRL_NUMBER, decode_integer, find_extension_by_oid};
use crate::crl::fetcher::is_http_url;
use crate::crl::types::{
    Certificate, Extension, PublicKeyInfo, ReasonCode, RevocationEntry, RevocationList,
};
use chrono::{DateTime, Utc};
use const_oid::ObjectIdentifier;
use der::Decode;
use num_bigint::BigInt;
use num_traits::Zero;
use snafu::{OptionExt, ResultExt};
use spki::SubjectPublicKeyInfoRef;
use x509_parser::extensions::{DistributionPointName, GeneralName, ParsedExtension};
use x509_parser::oid_registry::Oid;
use x509_parser::prelude::*;

/// Decodes a DER certificate into the fields revocation checking needs.
pub fn parse_certificate(cert_der: &[u8]) -> Result<Certificate, CrlError> {
    let (_, cert) =
        x509_parser::certificate::X509Certificate::from_der(cert_der).context(CertificateParsingSnafu)?;

    Ok(Certificate {
        serial_number: BigInt::from_signed_bytes_be(cert.raw_serial()),
        subject: cert.subject().to_string(),
        crl_distribution_points: extract_crl_distribution_points(&cert),
        extensions: convert_extensions(cert.extensions())?,
        public_key: parse_public_key(cert.public_key().raw)?,
    })
}

/// Decodes a DER CertificateList. A CRL without a CRL number gets number zero.
pub fn parse_crl(crl_der: &[u8]) -> Result<RevocationList, CrlError> {
    use x509_parser::revocation_list::CertificateRevocationList;
    let (_, crl) = CertificateRevocationList::from_der(crl_der).context(CrlParsingSnafu)?;

    let extensions = convert_extensions(crl.extensions())?;
    let number = match find_extension_by_oid(&extensions, &OID_CRL_NUMBER) {
        Some(ext) => decode_integer(&ext.value).context(CrlNumberParseSnafu)?,
        None => BigInt::zero(),
    };
    let next_update = match crl.tbs_cert_list.next_update {
        Some(time) => Some(asn1_time_to_datetime(&time).context(InvalidTimeSnafu)?),
        None => None,
    };

    let entries = crl
        .iter_revoked_certificates()
        .map(|revoked| {
            Ok(RevocationEntry {
                serial_number: BigInt::from_signed_bytes_be(revoked.raw_serial()),
                revocation_time: asn1_time_to_datetime(&revoked.revocation_date)
                    .context(InvalidTimeSnafu)?,
                reason_code: revoked
                    .reason_code()
                    .map(|(_, code)| ReasonCode(code.0))
                    .unwrap_or(ReasonCode::UNSPECIFIED),
                extensions: convert_extensions(revoked.extensions())?,
            })
        })
        .collect::<Result<Vec<_>, CrlError>>()?;

    Ok(RevocationList {
        number,
        this_update: asn1_time_to_datetime(&crl.tbs_cert_list.this_update)
            .context(InvalidTimeSnafu)?,
        next_update,
        entries,
        extensions,
        tbs: crl.tbs_cert_list.as_ref().to_vec(),
        signature_algorithm: convert_oid(&crl.signature_algorithm.algorithm)?,
        signature: crl.signature_value.data.to_vec(),
    })
}

fn extract_crl_distribution_points(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut crl_urls = Vec::new();
    for ext in cert.extensions() {
        if ext.oid == x509_parser::oid_registry::OID_X509_EXT_CRL_DISTRIBUTION_POINTS
            && let ParsedExtension::CRLDistributionPoints(crl_dist_points) = &ext.parsed_extension()
        {
            for dist_point in &crl_dist_points.points {
                if let Some(DistributionPointName::FullName(general_names)) =
                    &dist_point.distribution_point
                {
                    for general_name in general_names {
                        if let GeneralName::URI(uri) = general_name {
                            let url = uri.to_string();
                            if is_http_url(&url) {
                                crl_urls.push(url);
                            }
                        }
                    }
                }
            }
        }
    }
    crl_urls
}

fn convert_oid(oid: &Oid<'_>) -> Result<ObjectIdentifier, CrlError> {
    ObjectIdentifier::from_bytes(oid.as_bytes())
        .ok()
        .context(MalformedOidSnafu {
            oid: oid.to_id_string(),
        })
}

fn convert_extensions(extensions: &[X509Extension<'_>]) -> Result<Vec<Extension>, CrlError> {
    extensions
        .iter()
        .map(|ext| Ok(Extension::new(convert_oid(&ext.oid)?, ext.critical, ext.value)))
        .collect()
}

fn parse_public_key(spki_der: &[u8]) -> Result<PublicKeyInfo, CrlError> {
    let spki = SubjectPublicKeyInfoRef::from_der(spki_der).context(PublicKeyParseSnafu)?;
    Ok(PublicKeyInfo {
        algorithm: spki.algorithm.oid,
        // only EC keys carry an OID here (the named curve)
        parameters: spki.algorithm.parameters_oid().ok(),
        key: spki.subject_public_key.raw_bytes().to_vec(),
    })
}

pub(crate) fn asn1_time_to_datetime(
    asn1_time: &x509_parser::time::ASN1Time,
) -> Option<DateTime<Utc>> {
    let dt = asn1_time.to_datetime();
    let ts = dt.unix_timestamp();
    DateTime::<Utc>::from_timestamp(ts, 0)
}
