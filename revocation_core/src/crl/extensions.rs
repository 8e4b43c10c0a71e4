use crate::crl::error::{
    CrlError, DeltaCrlIndicatorParseSnafu, InvalidityDateFormatSnafu, InvalidityDateParseSnafu,
    InvalidityDateTrailingDataSnafu, UnsupportedEntryExtensionSnafu,
};
use crate::crl::types::{Extension, RevocationEntry};
use chrono::{DateTime, NaiveDateTime, Utc};
use const_oid::ObjectIdentifier;
use der::asn1::{AnyRef, IntRef};
use der::{Decode, Reader, SliceReader, Tag, Tagged};
use num_bigint::BigInt;
use snafu::{OptionExt, ResultExt};

/// Invalidity date CRL entry extension (RFC 5280, 5.3.2).
pub const OID_INVALIDITY_DATE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.24");
/// CRL number extension (RFC 5280, 5.2.3).
pub const OID_CRL_NUMBER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.20");
/// Delta CRL indicator extension (RFC 5280, 5.2.4).
pub const OID_DELTA_CRL_INDICATOR: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.27");
/// Issuing distribution point extension (RFC 5280, 5.2.5).
pub const OID_ISSUING_DISTRIBUTION_POINT: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.5.29.28");
/// CRL distribution points certificate extension (RFC 5280, 4.2.1.13).
pub const OID_CRL_DISTRIBUTION_POINTS: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.5.29.31");
/// Freshest CRL, the delta CRL distribution point (RFC 5280, 5.2.6).
pub const OID_FRESHEST_CRL: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.46");

pub const OID_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
pub const OID_SHA256_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
pub const OID_SHA384_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
pub const OID_SHA512_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");
pub const OID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
pub const OID_ECDSA_WITH_SHA256: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.2");
pub const OID_ECDSA_WITH_SHA384: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");
pub const OID_SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
pub const OID_SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
pub const OID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// Returns the first extension with the given identifier.
pub fn find_extension_by_oid<'a>(
    extensions: &'a [Extension],
    oid: &ObjectIdentifier,
) -> Option<&'a Extension> {
    extensions.iter().find(|ext| &ext.oid == oid)
}

/// Extensions of a revocation entry that take part in the status decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryExtensions {
    /// When the key is believed to have become invalid.
    pub invalidity_date: Option<DateTime<Utc>>,
}

pub fn parse_entry_extensions(entry: &RevocationEntry) -> Result<EntryExtensions, CrlError> {
    let mut extensions = EntryExtensions::default();
    for ext in &entry.extensions {
        if ext.oid == OID_INVALIDITY_DATE {
            extensions.invalidity_date = Some(parse_invalidity_date(&ext.value)?);
        } else if ext.critical {
            // RFC 5280, Section 5.2
            return UnsupportedEntryExtensionSnafu {
                oid: ext.oid.to_string(),
            }
            .fail();
        }
    }
    Ok(extensions)
}

/// GeneralizedTime, also in its non-DER forms with fractional seconds or a
/// numeric offset.
fn parse_invalidity_date(value: &[u8]) -> Result<DateTime<Utc>, CrlError> {
    let mut reader = SliceReader::new(value).context(InvalidityDateParseSnafu)?;
    let time = AnyRef::decode(&mut reader).context(InvalidityDateParseSnafu)?;
    if !reader.is_finished() {
        return InvalidityDateTrailingDataSnafu.fail();
    }
    time.tag()
        .assert_eq(Tag::GeneralizedTime)
        .context(InvalidityDateParseSnafu)?;

    let text = String::from_utf8_lossy(time.value());
    parse_generalized_time(&text).context(InvalidityDateFormatSnafu { value: &*text })
}

fn parse_generalized_time(text: &str) -> Option<DateTime<Utc>> {
    if let Some(local) = text.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(local, "%Y%m%d%H%M%S%.f")
            .ok()
            .map(|time| time.and_utc());
    }
    DateTime::parse_from_str(text, "%Y%m%d%H%M%S%.f%z")
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// Decodes a DER INTEGER such as a CRL number or a delta CRL indicator.
/// Bytes after the INTEGER are an error.
pub fn decode_integer(value: &[u8]) -> Result<BigInt, der::Error> {
    let int = IntRef::from_der(value)?;
    Ok(BigInt::from_signed_bytes_be(int.as_bytes()))
}

/// Minimum base CRL number carried by a delta CRL indicator value.
pub fn parse_delta_crl_indicator(ext: &Extension) -> Result<BigInt, CrlError> {
    decode_integer(&ext.value).context(DeltaCrlIndicatorParseSnafu)
}
