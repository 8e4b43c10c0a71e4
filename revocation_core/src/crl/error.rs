use crate::crl::fetcher::FetchError;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use snafu::{Location, Snafu};

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum CrlError {
    #[snafu(display("CRL is not supported for this certificate"))]
    CrlNotSupported {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("CRL fetcher is not configured"))]
    MissingFetcher {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to download CRL from {url}"))]
    CrlDownload {
        url: String,
        source: FetchError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("CRL check cancelled while fetching {url}"))]
    Cancelled {
        url: String,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Freshest CRL from certificate extension is not supported"))]
    FreshestCrlUnsupported {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to validate CRL from {url}"))]
    CrlValidation {
        url: String,
        #[snafu(source(from(CrlError, Box::new)))]
        source: Box<CrlError>,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to check revocation status from {url}"))]
    RevocationCheck {
        url: String,
        #[snafu(source(from(CrlError, Box::new)))]
        source: Box<CrlError>,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to validate base CRL"))]
    BaseCrlInvalid {
        #[snafu(source(from(CrlError, Box::new)))]
        source: Box<CrlError>,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to validate delta CRL"))]
    DeltaCrlInvalid {
        #[snafu(source(from(CrlError, Box::new)))]
        source: Box<CrlError>,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("CRL is not signed by CA {issuer}"))]
    InvalidCrlSignature {
        issuer: String,
        source: aws_lc_rs::error::Unspecified,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display(
        "Unsupported CRL signature algorithm {algorithm} for issuer key {key_algorithm}"
    ))]
    UnsupportedSignatureAlgorithm {
        algorithm: String,
        key_algorithm: String,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("CRL NextUpdate is not set"))]
    NextUpdateMissing {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Expired CRL: current time {now} is after CRL NextUpdate {next_update}"))]
    CrlExpired {
        now: DateTime<Utc>,
        next_update: DateTime<Utc>,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Unsupported critical extension found in CRL: {oid}"))]
    UnsupportedCrlExtension {
        oid: String,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Unsupported critical extension found in CRL entry: {oid}"))]
    UnsupportedEntryExtension {
        oid: String,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Delta CRL number {delta} is not greater than the base CRL number {base}"))]
    DeltaCrlNumberNotGreater {
        delta: BigInt,
        base: BigInt,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Delta CRL indicator extension is not found"))]
    DeltaCrlIndicatorMissing {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to parse delta CRL indicator extension"))]
    DeltaCrlIndicatorParse {
        source: der::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display(
        "Delta CRL indicator {indicator} is not less than or equal to the base CRL number {base}"
    ))]
    DeltaCrlIndicatorExceedsBase {
        indicator: BigInt,
        base: BigInt,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to parse invalidity date"))]
    InvalidityDateParse {
        source: der::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Invalid invalidity date extension: trailing data"))]
    InvalidityDateTrailingData {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Invalid invalidity date: {value}"))]
    InvalidityDateFormat {
        value: String,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to parse certificate"))]
    CertificateParsing {
        source: x509_parser::nom::Err<x509_parser::error::X509Error>,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to parse CRL data"))]
    CrlParsing {
        source: x509_parser::nom::Err<x509_parser::error::X509Error>,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to parse CRL number"))]
    CrlNumberParse {
        source: der::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to parse subject public key info"))]
    PublicKeyParse {
        source: der::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Malformed object identifier {oid}"))]
    MalformedOid {
        oid: String,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Time value is out of range"))]
    InvalidTime {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Certificate is revoked"))]
    Revoked {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Certificate revocation status could not be determined"))]
    Undetermined {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to build HTTP client for CRL requests"))]
    HttpClientBuild {
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },
}
