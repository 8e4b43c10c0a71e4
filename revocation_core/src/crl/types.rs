use chrono::{DateTime, Utc};
use const_oid::ObjectIdentifier;
use num_bigint::BigInt;

/// RFC 5280, 5.3.1 CRLReason.
///
/// Values outside the named constants are kept as-is; anything other than
/// certificateHold and removeFromCRL counts as a permanent revocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReasonCode(pub u8);

impl ReasonCode {
    pub const UNSPECIFIED: ReasonCode = ReasonCode(0);
    pub const KEY_COMPROMISE: ReasonCode = ReasonCode(1);
    pub const CA_COMPROMISE: ReasonCode = ReasonCode(2);
    pub const AFFILIATION_CHANGED: ReasonCode = ReasonCode(3);
    pub const SUPERSEDED: ReasonCode = ReasonCode(4);
    pub const CESSATION_OF_OPERATION: ReasonCode = ReasonCode(5);
    pub const CERTIFICATE_HOLD: ReasonCode = ReasonCode(6);
    // value 7 is not used
    pub const REMOVE_FROM_CRL: ReasonCode = ReasonCode(8);
    pub const PRIVILEGE_WITHDRAWN: ReasonCode = ReasonCode(9);
    pub const AA_COMPROMISE: ReasonCode = ReasonCode(10);

    /// certificateHold or removeFromCRL
    pub fn is_temporary(self) -> bool {
        self == Self::CERTIFICATE_HOLD || self == Self::REMOVE_FROM_CRL
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER contents of the extnValue OCTET STRING.
    pub value: Vec<u8>,
}

impl Extension {
    pub fn new(oid: ObjectIdentifier, critical: bool, value: impl Into<Vec<u8>>) -> Self {
        Self {
            oid,
            critical,
            value: value.into(),
        }
    }
}

/// Issuer public key as needed for CRL signature verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    pub algorithm: ObjectIdentifier,
    /// Named curve for EC keys.
    pub parameters: Option<ObjectIdentifier>,
    /// Contents of the subjectPublicKey BIT STRING.
    pub key: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Certificate {
    pub serial_number: BigInt,
    pub subject: String,
    pub crl_distribution_points: Vec<String>,
    pub extensions: Vec<Extension>,
    pub public_key: PublicKeyInfo,
}

#[derive(Debug, Clone)]
pub struct RevocationEntry {
    pub serial_number: BigInt,
    pub revocation_time: DateTime<Utc>,
    pub reason_code: ReasonCode,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone)]
pub struct RevocationList {
    pub number: BigInt,
    pub this_update: DateTime<Utc>,
    pub next_update: Option<DateTime<Utc>>,
    pub entries: Vec<RevocationEntry>,
    pub extensions: Vec<Extension>,
    /// DER of the TBSCertList, i.e. the signed bytes.
    pub tbs: Vec<u8>,
    pub signature_algorithm: ObjectIdentifier,
    pub signature: Vec<u8>,
}

/// A base CRL and the delta CRL that applies on top of it, if any.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub base_crl: RevocationList,
    pub delta_crl: Option<RevocationList>,
}

impl Bundle {
    /// Base entries in stored order, then delta entries in stored order.
    pub fn entries(&self) -> impl Iterator<Item = &RevocationEntry> {
        self.base_crl.entries.iter().chain(
            self.delta_crl
                .iter()
                .flat_map(|delta| delta.entries.iter()),
        )
    }
}
