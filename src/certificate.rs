//! Client certificate normalization.
//!
//! The web service authenticates with a mutual-TLS client certificate. Users usually
//! hold it as a passphrase-protected PKCS#12 archive (`.pfx`), while the transport
//! layer wants PEM strings. [`Pkcs12Decoder`] performs that conversion; anything
//! implementing [`CertificateDecoder`] can stand in for it.

use std::fmt;

use p12_keystore::KeyStore;
use pem::{EncodeConfig, LineEnding, Pem};
use thiserror::Error;
use tracing::debug;

const CERTIFICATE_TAG: &str = "CERTIFICATE";
const PRIVATE_KEY_TAG: &str = "PRIVATE KEY";

/// Failures while opening a combined archive.
#[derive(Debug, Error)]
pub enum CertificateError {
    /// Wrong passphrase or malformed archive
    #[error("unable to open PKCS#12 archive: {0}")]
    Archive(String),
    /// The archive opened but holds no private key entry
    #[error("PKCS#12 archive has no private key entry")]
    MissingKeyEntry,
    /// The key entry carries no certificate
    #[error("PKCS#12 key entry '{0}' has no certificate")]
    MissingCertificate(String),
}

/// PEM-encoded certificate and private key.
#[derive(Clone, PartialEq, Eq)]
pub struct PemPair {
    pub cert: String,
    pub key: String,
}

impl fmt::Debug for PemPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PemPair")
            .field("cert", &self.cert)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Turns a combined archive plus passphrase into a PEM pair.
pub trait CertificateDecoder {
    fn decode(&self, archive: &[u8], passphrase: &str) -> Result<PemPair, CertificateError>;
}

/// Default decoder backed by `p12-keystore`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pkcs12Decoder;

impl CertificateDecoder for Pkcs12Decoder {
    fn decode(&self, archive: &[u8], passphrase: &str) -> Result<PemPair, CertificateError> {
        let keystore = KeyStore::from_pkcs12(archive, passphrase)
            .map_err(|e| CertificateError::Archive(e.to_string()))?;

        let (alias, chain) = keystore
            .private_key_chain()
            .ok_or(CertificateError::MissingKeyEntry)?;

        // The leaf certificate comes first in the chain
        let leaf = chain
            .chain()
            .first()
            .ok_or_else(|| CertificateError::MissingCertificate(alias.to_string()))?;

        debug!(
            alias = alias,
            chain_len = chain.chain().len(),
            "Decoded PKCS#12 archive"
        );

        Ok(PemPair {
            cert: encode_pem(CERTIFICATE_TAG, leaf.as_der()),
            key: encode_pem(PRIVATE_KEY_TAG, chain.key()),
        })
    }
}

fn encode_pem(tag: &str, der: &[u8]) -> String {
    let config = EncodeConfig::new().set_line_ending(LineEnding::LF);
    pem::encode_config(&Pem::new(tag, der.to_vec()), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_archive_is_rejected() {
        let result = Pkcs12Decoder.decode(b"definitely not a pfx", "secret");
        assert!(matches!(result, Err(CertificateError::Archive(_))));
    }

    #[test]
    fn empty_archive_is_rejected() {
        let result = Pkcs12Decoder.decode(&[], "secret");
        assert!(result.is_err());
    }

    #[test]
    fn pem_pair_debug_redacts_key() {
        let pair = PemPair {
            cert: "-----BEGIN CERTIFICATE-----".to_string(),
            key: "super-secret-key".to_string(),
        };
        let rendered = format!("{pair:?}");
        assert!(rendered.contains("BEGIN CERTIFICATE"));
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn archive_error_mentions_cause() {
        let err = CertificateError::Archive("mac mismatch".to_string());
        assert!(err.to_string().contains("mac mismatch"));
    }
}
