use crate::crl::error::{CrlError, InvalidCrlSignatureSnafu, UnsupportedSignatureAlgorithmSnafu};
use crate::crl::extensions::{
    OID_EC_PUBLIC_KEY, OID_ECDSA_WITH_SHA256, OID_ECDSA_WITH_SHA384, OID_ED25519,
    OID_RSA_ENCRYPTION, OID_SECP256R1, OID_SECP384R1, OID_SHA256_WITH_RSA, OID_SHA384_WITH_RSA,
    OID_SHA512_WITH_RSA,
};
use crate::crl::types::{Certificate, RevocationList};
use aws_lc_rs::signature::{self, UnparsedPublicKey, VerificationAlgorithm};
use snafu::ResultExt;

fn verification_algorithm(
    crl: &RevocationList,
    issuer: &Certificate,
) -> Option<&'static dyn VerificationAlgorithm> {
    let key = &issuer.public_key;
    let sig = crl.signature_algorithm;
    if key.algorithm == OID_RSA_ENCRYPTION {
        return match sig {
            s if s == OID_SHA256_WITH_RSA => Some(&signature::RSA_PKCS1_2048_8192_SHA256),
            s if s == OID_SHA384_WITH_RSA => Some(&signature::RSA_PKCS1_2048_8192_SHA384),
            s if s == OID_SHA512_WITH_RSA => Some(&signature::RSA_PKCS1_2048_8192_SHA512),
            _ => None,
        };
    }
    if key.algorithm == OID_EC_PUBLIC_KEY {
        return match (key.parameters, sig) {
            (Some(curve), s) if curve == OID_SECP256R1 && s == OID_ECDSA_WITH_SHA256 => {
                Some(&signature::ECDSA_P256_SHA256_ASN1)
            }
            (Some(curve), s) if curve == OID_SECP384R1 && s == OID_ECDSA_WITH_SHA384 => {
                Some(&signature::ECDSA_P384_SHA384_ASN1)
            }
            _ => None,
        };
    }
    if key.algorithm == OID_ED25519 && sig == OID_ED25519 {
        return Some(&signature::ED25519);
    }
    None
}

/// Checks that `crl` was signed by the key of `issuer`.
pub fn verify_crl_signature(crl: &RevocationList, issuer: &Certificate) -> Result<(), CrlError> {
    let Some(algorithm) = verification_algorithm(crl, issuer) else {
        return UnsupportedSignatureAlgorithmSnafu {
            algorithm: crl.signature_algorithm.to_string(),
            key_algorithm: issuer.public_key.algorithm.to_string(),
        }
        .fail();
    };
    UnparsedPublicKey::new(algorithm, &issuer.public_key.key)
        .verify(&crl.tbs, &crl.signature)
        .context(InvalidCrlSignatureSnafu {
            issuer: issuer.subject.clone(),
        })
}
