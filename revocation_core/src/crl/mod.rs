pub mod certificate_parser;
pub mod checker;
pub mod config;
pub mod error;
pub mod extensions;
pub mod fetcher;
pub mod resolver;
pub mod signature;
pub mod types;
pub mod validator;

pub use certificate_parser::{parse_certificate, parse_crl};
pub use checker::{CertCheckStatusOptions, cert_check_status, is_supported};
pub use config::{CertRevocationCheckMode, CrlConfig};
pub use error::CrlError;
pub use extensions::{EntryExtensions, find_extension_by_oid, parse_entry_extensions};
pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use resolver::check_revocation;
pub use types::{Bundle, Certificate, Extension, PublicKeyInfo, ReasonCode, RevocationEntry, RevocationList};
pub use validator::{validate_bundle, validate_crl};
