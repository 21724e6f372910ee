//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use rustls_pemfile::{certs, private_key};
use thiserror::Error;

/// TLS loading and configuration error.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("TLS configuration error: {0}")]
    Configuration(String),
}

/// A client certificate chain with its private key.
#[derive(Debug)]
pub struct ClientIdentity {
    pub cert_chain: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

/// The TLS material carried from validation into the exporter.
///
/// The client identity and CA pool are fully loaded; the server pair stays
/// as paths and is only read when the TLS listener is started.
#[derive(Debug, Default)]
pub struct TlsMaterial {
    /// Client certificate/key pair presented to Redis, if configured.
    pub client_identity: Option<ClientIdentity>,

    /// Trust anchors used to verify the Redis server certificate.
    pub ca_pool: Option<RootCertStore>,

    /// Server TLS certificate path for the HTTPS listener.
    pub server_cert_file: String,

    /// Server TLS private key path for the HTTPS listener.
    pub server_key_file: String,
}

impl TlsMaterial {
    /// Whether the metrics listener should terminate TLS. Requires both
    /// halves of the server pair.
    pub fn has_server_pair(&self) -> bool {
        !self.server_cert_file.is_empty() && !self.server_key_file.is_empty()
    }

    /// Whether connections to Redis should be made over TLS.
    pub fn dials_tls(&self) -> bool {
        self.client_identity.is_some() || self.ca_pool.is_some()
    }
}

/// Load a client certificate chain and private key from PEM files.
pub fn load_client_pair(cert_path: &Path, key_path: &Path) -> Result<ClientIdentity, TlsError> {
    let cert_chain = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;
    Ok(ClientIdentity { cert_chain, key })
}

/// Load all certificates from a PEM file.
pub fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let cert_chain: Vec<CertificateDer<'static>> = certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TlsError::InvalidCertificate(e.to_string()))?;

    if cert_chain.is_empty() {
        return Err(TlsError::InvalidCertificate(
            "no certificates found in file".to_string(),
        ));
    }

    Ok(cert_chain)
}

/// Load a private key from a PEM file.
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let key = private_key(&mut reader)
        .map_err(TlsError::Io)?
        .ok_or(TlsError::InvalidPrivateKey)?;

    Ok(key)
}

/// Read a PEM bundle and collect every certificate in it into a root store.
pub fn load_ca_pool(path: &Path) -> Result<RootCertStore, TlsError> {
    let cert_chain = load_certs(path)?;

    let mut pool = RootCertStore::empty();
    for cert in cert_chain {
        pool.add(cert)
            .map_err(|e| TlsError::InvalidCertificate(e.to_string()))?;
    }
    Ok(pool)
}

/// Build the rustls client configuration used to dial Redis.
pub fn client_config(material: &TlsMaterial, skip_verification: bool) -> Result<ClientConfig, TlsError> {
    let roots = material
        .ca_pool
        .clone()
        .unwrap_or_else(RootCertStore::empty);

    let builder = ClientConfig::builder().with_root_certificates(roots);
    let mut config = match &material.client_identity {
        Some(identity) => builder
            .with_client_auth_cert(identity.cert_chain.clone(), identity.key.clone_key())
            .map_err(|e| TlsError::Configuration(e.to_string()))?,
        None => builder.with_no_client_auth(),
    };

    if skip_verification {
        config
            .dangerous()
            .set_certificate_verifier(Arc::new(NoVerification));
    }

    Ok(config)
}

/// Load the server TLS configuration for the HTTPS listener from
/// certificate and key files.
pub async fn load_server_config(
    cert_path: &Path,
    key_path: &Path,
) -> Result<RustlsConfig, std::io::Error> {
    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

/// Certificate verifier that accepts any server certificate.
#[derive(Debug)]
struct NoVerification;

impl ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::ED25519,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("redis-exporter-tls-{}-{}", std::process::id(), name))
    }

    fn write_self_signed(prefix: &str) -> (PathBuf, PathBuf) {
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert_path = temp_path(&format!("{prefix}-cert.pem"));
        let key_path = temp_path(&format!("{prefix}-key.pem"));
        fs::write(&cert_path, cert.cert.pem()).unwrap();
        fs::write(&key_path, cert.key_pair.serialize_pem()).unwrap();
        (cert_path, key_path)
    }

    #[test]
    fn loads_self_signed_pair() {
        let (cert_path, key_path) = write_self_signed("pair");
        let identity = load_client_pair(&cert_path, &key_path).unwrap();
        fs::remove_file(&cert_path).unwrap();
        fs::remove_file(&key_path).unwrap();

        assert_eq!(identity.cert_chain.len(), 1);
    }

    #[test]
    fn rejects_garbage_certificate() {
        let path = temp_path("garbage.pem");
        fs::write(&path, "not a certificate").unwrap();
        let err = load_certs(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(matches!(err, TlsError::InvalidCertificate(_)));
    }

    #[test]
    fn ca_pool_collects_certificates() {
        let (cert_path, key_path) = write_self_signed("ca");
        let pool = load_ca_pool(&cert_path).unwrap();
        fs::remove_file(&cert_path).unwrap();
        fs::remove_file(&key_path).unwrap();

        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn server_pair_requires_both_paths() {
        let mut material = TlsMaterial::default();
        assert!(!material.has_server_pair());

        material.server_cert_file = "cert.pem".to_string();
        assert!(!material.has_server_pair());

        material.server_key_file = "key.pem".to_string();
        assert!(material.has_server_pair());
    }

    #[test]
    fn plain_material_dials_plain_tcp() {
        assert!(!TlsMaterial::default().dials_tls());
    }
}
