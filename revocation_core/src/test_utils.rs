/// Sets up logging for tests
pub fn setup_logging() {
    use tracing::Level;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env()
        .unwrap();
    let _ = tracing_subscriber::fmt::fmt()
        .with_env_filter(env_filter)
        .try_init();
}

pub mod crl {
    use crate::crl::extensions::{
        OID_CRL_NUMBER, OID_DELTA_CRL_INDICATOR, OID_ED25519, OID_INVALIDITY_DATE,
    };
    use crate::crl::types::{
        Certificate, Extension, PublicKeyInfo, ReasonCode, RevocationEntry, RevocationList,
    };
    use aws_lc_rs::rand::SystemRandom;
    use aws_lc_rs::signature::{Ed25519KeyPair, KeyPair};
    use chrono::{DateTime, Duration, Utc};
    use der::Encode;
    use der::asn1::GeneralizedTime;
    use num_bigint::BigInt;

    /// A CA with a fresh Ed25519 key that signs test CRLs.
    pub struct TestIssuer {
        key_pair: Ed25519KeyPair,
        pub certificate: Certificate,
    }

    impl TestIssuer {
        pub fn new(subject: &str) -> Self {
            let rng = SystemRandom::new();
            let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
            let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap();
            let certificate = Certificate {
                serial_number: BigInt::from(1),
                subject: format!("CN={subject}"),
                crl_distribution_points: Vec::new(),
                extensions: Vec::new(),
                public_key: PublicKeyInfo {
                    algorithm: OID_ED25519,
                    parameters: None,
                    key: key_pair.public_key().as_ref().to_vec(),
                },
            };
            Self {
                key_pair,
                certificate,
            }
        }

        /// Fills in the signed bytes from the list content and signs them.
        pub fn sign(&self, mut crl: RevocationList) -> RevocationList {
            crl.tbs = format!(
                "{:?}|{:?}|{:?}|{:?}",
                crl.number, crl.next_update, crl.entries, crl.extensions
            )
            .into_bytes();
            crl.signature_algorithm = OID_ED25519;
            crl.signature = self.key_pair.sign(&crl.tbs).as_ref().to_vec();
            crl
        }
    }

    pub fn integer_der(value: u64) -> Vec<u8> {
        value.to_der().unwrap()
    }

    /// Unsigned, fresh CRL with the given CRL number.
    pub fn base_crl(number: u64) -> RevocationList {
        let now = Utc::now();
        RevocationList {
            number: BigInt::from(number),
            this_update: now - Duration::hours(1),
            next_update: Some(now + Duration::days(1)),
            entries: Vec::new(),
            extensions: vec![Extension::new(OID_CRL_NUMBER, false, integer_der(number))],
            tbs: Vec::new(),
            signature_algorithm: OID_ED25519,
            signature: Vec::new(),
        }
    }

    /// Unsigned delta CRL pointing at `base_number` as its minimum base.
    pub fn delta_crl(number: u64, base_number: u64) -> RevocationList {
        let mut crl = base_crl(number);
        crl.extensions.push(Extension::new(
            OID_DELTA_CRL_INDICATOR,
            true,
            integer_der(base_number),
        ));
        crl
    }

    pub fn entry(serial: u64, reason_code: ReasonCode, revoked_at: DateTime<Utc>) -> RevocationEntry {
        RevocationEntry {
            serial_number: BigInt::from(serial),
            revocation_time: revoked_at,
            reason_code,
            extensions: Vec::new(),
        }
    }

    pub fn invalidity_date_extension(date: DateTime<Utc>) -> Extension {
        let time = GeneralizedTime::from_unix_duration(std::time::Duration::from_secs(
            date.timestamp() as u64,
        ))
        .unwrap();
        Extension::new(OID_INVALIDITY_DATE, false, time.to_der().unwrap())
    }

    pub fn leaf_certificate(serial: u64, crl_urls: &[&str]) -> Certificate {
        Certificate {
            serial_number: BigInt::from(serial),
            subject: "CN=leaf.example.com".to_string(),
            crl_distribution_points: crl_urls.iter().map(|u| u.to_string()).collect(),
            extensions: Vec::new(),
            public_key: PublicKeyInfo {
                algorithm: OID_ED25519,
                parameters: None,
                key: vec![0; 32],
            },
        }
    }
}

pub mod x509 {
    #![allow(deprecated)]
    use openssl::asn1::Asn1Time;
    use openssl::bn::BigNum;
    use openssl::ec::{EcGroup, EcKey};
    use openssl::hash::MessageDigest;
    use openssl::nid::Nid;
    use openssl::pkey::{PKey, Private};
    use openssl::rsa::Rsa;
    use openssl::x509::{X509, X509Extension, X509Name, X509NameBuilder};

    pub fn make_name(cn: &str) -> X509Name {
        let mut b = X509NameBuilder::new().unwrap();
        b.append_entry_by_nid(Nid::COMMONNAME, cn).unwrap();
        b.build()
    }

    pub fn gen_rsa_key() -> PKey<Private> {
        let rsa = Rsa::generate(2048).unwrap();
        PKey::from_rsa(rsa).unwrap()
    }

    pub fn gen_ec_key() -> PKey<Private> {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
        PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
    }

    /// Self-signed certificate, optionally with a CRL distribution points
    /// extension in OpenSSL config syntax (e.g. `URI:http://...`).
    pub fn make_certificate(
        cn: &str,
        key: &PKey<Private>,
        serial: u32,
        crl_distribution_points: Option<&str>,
    ) -> X509 {
        let name = make_name(cn);
        let mut builder = X509::builder().unwrap();
        builder.set_version(2).unwrap();
        let serial = BigNum::from_u32(serial).unwrap().to_asn1_integer().unwrap();
        builder.set_serial_number(&serial).unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder.set_pubkey(key).unwrap();
        builder
            .set_not_before(&Asn1Time::days_from_now(0).unwrap())
            .unwrap();
        builder
            .set_not_after(&Asn1Time::days_from_now(30).unwrap())
            .unwrap();
        if let Some(points) = crl_distribution_points {
            let ext = X509Extension::new_nid(
                None,
                Some(&builder.x509v3_context(None, None)),
                Nid::CRL_DISTRIBUTION_POINTS,
                points,
            )
            .unwrap();
            builder.append_extension(ext).unwrap();
        }
        builder.sign(key, MessageDigest::sha256()).unwrap();
        builder.build()
    }
}
