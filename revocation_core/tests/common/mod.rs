#![allow(dead_code)]

extern crate revocation_core;
extern crate tracing;
extern crate tracing_subscriber;

use async_trait::async_trait;
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{Ed25519KeyPair, KeyPair};
use chrono::{DateTime, Duration, Utc};
use der::Encode;
use der::asn1::GeneralizedTime;
use num_bigint::BigInt;
use revocation_core::crl::extensions::{
    OID_CRL_NUMBER, OID_DELTA_CRL_INDICATOR, OID_ED25519, OID_FRESHEST_CRL, OID_INVALIDITY_DATE,
};
use revocation_core::crl::{
    Bundle, Certificate, Extension, FetchError, Fetcher, PublicKeyInfo, ReasonCode,
    RevocationEntry, RevocationList,
};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub fn setup_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::DEBUG.into())
        .from_env()
        .unwrap();
    let _ = tracing_subscriber::fmt::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

/// Error chain rendered as one line, outermost first.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}

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

    pub fn bundle(&self, base: RevocationList, delta: Option<RevocationList>) -> Bundle {
        Bundle {
            base_crl: self.sign(base),
            delta_crl: delta.map(|d| self.sign(d)),
        }
    }
}

fn integer_der(value: u64) -> Vec<u8> {
    value.to_der().unwrap()
}

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
    let time =
        GeneralizedTime::from_unix_duration(std::time::Duration::from_secs(date.timestamp() as u64))
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

/// Marks the certificate as pointing at a delta CRL. The value is never read.
pub fn with_freshest_crl(mut cert: Certificate) -> Certificate {
    cert.extensions
        .push(Extension::new(OID_FRESHEST_CRL, false, Vec::new()));
    cert
}

/// Serves prepared bundles by URL and records every URL it is asked for.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Result<Bundle, String>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle(mut self, url: &str, bundle: Bundle) -> Self {
        self.responses.insert(url.to_string(), Ok(bundle));
        self
    }

    pub fn with_failure(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, _cancel: &CancellationToken, url: &str) -> Result<Bundle, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(Ok(bundle)) => Ok(bundle.clone()),
            Some(Err(message)) => Err(message.clone().into()),
            None => Err(format!("no CRL published at {url}").into()),
        }
    }
}
