//! TLS acceptor construction.
//!
//! Loads the PEM files named by [`TlsConfig`] into a rustls server
//! config. Handshake mechanics stay inside rustls; the server only
//! wraps accepted streams through the acceptor built here.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::rustls::ServerConfig as RustlsServerConfig;
use tokio_rustls::TlsAcceptor;

use super::config::TlsConfig;
use crate::error::Error;

/// Build a TLS acceptor from PEM certificate and key files.
///
/// With `no_http2` set, `h2` is left out of the ALPN list so clients
/// never negotiate the upgraded protocol.
pub(crate) fn build_acceptor(cfg: &TlsConfig, no_http2: bool) -> Result<TlsAcceptor, Error> {
    let mut reader = BufReader::new(File::open(&cfg.cert_path).map_err(|err| {
        Error::Config(format!(
            "failed to open TLS certificate file '{}': {err}",
            cfg.cert_path.display()
        ))
    })?);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<CertificateDer<'static>>, _>>()
        .map_err(|err| {
            Error::Config(format!(
                "failed to read TLS certificate file '{}': {err}",
                cfg.cert_path.display()
            ))
        })?;

    let mut reader = BufReader::new(File::open(&cfg.key_path).map_err(|err| {
        Error::Config(format!(
            "failed to open TLS key file '{}': {err}",
            cfg.key_path.display()
        ))
    })?);
    let key: PrivateKeyDer<'static> = rustls_pemfile::private_key(&mut reader)
        .map_err(|err| {
            Error::Config(format!(
                "failed to read TLS key file '{}': {err}",
                cfg.key_path.display()
            ))
        })?
        .ok_or_else(|| {
            Error::Config(format!(
                "TLS key file '{}' does not contain a usable key",
                cfg.key_path.display()
            ))
        })?;

    let mut tls_config = RustlsServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|err| Error::Config(format!("failed to build TLS server config: {err}")))?;

    tls_config.alpn_protocols = if no_http2 {
        vec![b"http/1.1".to_vec()]
    } else {
        vec![b"h2".to_vec(), b"http/1.1".to_vec()]
    };

    Ok(TlsAcceptor::from(Arc::new(tls_config)))
}
