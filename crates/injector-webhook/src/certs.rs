use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use ::tracing::{info, warn};
use anyhow::{anyhow, Result};
use axum_server::tls_rustls::RustlsConfig;
use rustls::{crypto::CryptoProvider, server::WebPkiClientVerifier, RootCertStore, ServerConfig};
use rustls_pki_types::{pem::SliceIter, CertificateDer, PrivateKeyDer};

// This is required by certificate hot reload when using inotify, which is available only on linux
#[cfg(target_os = "linux")]
use tokio_stream::StreamExt;

use crate::config::TlsConfig;

/// There's no watching of the certificate files on non-linux platforms
/// since we rely on inotify to watch for changes
#[cfg(not(target_os = "linux"))]
pub(crate) async fn create_tls_config_and_watch_certificate_changes(
    tls_config: TlsConfig,
) -> Result<RustlsConfig> {
    let (cert, key) = load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file).await?;
    let client_verifier = if tls_config.client_ca_file.is_empty() {
        None
    } else {
        Some(load_client_ca_certs(tls_config.client_ca_file.clone()).await?)
    };
    let server_config = build_tls_server_config(cert, key, client_verifier)?;

    Ok(RustlsConfig::from_config(Arc::new(server_config)))
}

/// Return the RustlsConfig and watch for changes in the certificate files
/// using inotify.
/// When both the certificate and its key are changed, the RustlsConfig is reloaded,
/// causing the https server to use the new certificate. Client CA changes are
/// applied as soon as they are detected.
#[cfg(target_os = "linux")]
pub(crate) async fn create_tls_config_and_watch_certificate_changes(
    tls_config: TlsConfig,
) -> Result<RustlsConfig> {
    use ::tracing::error;
    use inotify::WatchDescriptor;

    let (mut cert, mut key) =
        load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file).await?;
    let mut client_verifier = if tls_config.client_ca_file.is_empty() {
        None
    } else {
        Some(load_client_ca_certs(tls_config.client_ca_file.clone()).await?)
    };
    let initial_config =
        build_tls_server_config(cert.clone(), key.clone_key(), client_verifier.clone())?;

    let rust_config = RustlsConfig::from_config(Arc::new(initial_config));
    let reloadable_rust_config = rust_config.clone();

    let inotify =
        inotify::Inotify::init().map_err(|e| anyhow!("Cannot initialize inotify: {e}"))?;
    let cert_watch = inotify
        .watches()
        .add(&tls_config.cert_file, inotify::WatchMask::CLOSE_WRITE)
        .map_err(|e| anyhow!("Cannot watch certificate file: {e}"))?;
    let key_watch = inotify
        .watches()
        .add(&tls_config.key_file, inotify::WatchMask::CLOSE_WRITE)
        .map_err(|e| anyhow!("Cannot watch key file: {e}"))?;

    let client_ca_watches = tls_config
        .client_ca_file
        .iter()
        .map(|path| {
            inotify
                .watches()
                .add(path, inotify::WatchMask::CLOSE_WRITE)
                .map_err(|e| anyhow!("Cannot watch client CA file: {e}"))
        })
        .collect::<Result<Vec<WatchDescriptor>>>()?;

    let buffer = [0; 1024];
    let stream = inotify
        .into_event_stream(buffer)
        .map_err(|e| anyhow!("Cannot create inotify event stream: {e}"))?;

    tokio::spawn(async move {
        tokio::pin!(stream);
        let mut cert_changed = false;
        let mut key_changed = false;

        while let Some(event) = stream.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    warn!("Cannot read inotify event: {e}");
                    continue;
                }
            };

            if event.wd == cert_watch {
                info!("TLS certificate file has been modified");
                cert_changed = true;
            }
            if event.wd == key_watch {
                info!("TLS key file has been modified");
                key_changed = true;
            }
            let client_ca_changed = client_ca_watches.iter().any(|wd| event.wd == *wd);

            if client_ca_changed {
                info!("Reloading client CA certificates");

                match load_client_ca_certs(tls_config.client_ca_file.clone()).await {
                    Ok(cv) => client_verifier = Some(cv),
                    Err(e) => {
                        error!("Failed to reload client CA certificates: {e}");
                        continue;
                    }
                }
            }

            // The certificate and its key are written separately: wait for both
            // before swapping them, otherwise they would not match.
            let server_cert_changed = key_changed && cert_changed;
            if server_cert_changed {
                info!("Reloading server TLS certificates");

                cert_changed = false;
                key_changed = false;

                match load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file).await
                {
                    Ok(ck) => (cert, key) = ck,
                    Err(e) => {
                        error!("Failed to reload TLS certificates: {e}");
                        continue;
                    }
                }
            }

            if !client_ca_changed && !server_cert_changed {
                continue;
            }

            match build_tls_server_config(cert.clone(), key.clone_key(), client_verifier.clone()) {
                Ok(server_config) => {
                    reloadable_rust_config.reload_from_config(Arc::new(server_config));
                }
                Err(e) => {
                    error!("Failed to reload TLS certificate: {e}");
                }
            }
        }
    });

    Ok(rust_config)
}

// Pinned explicitly: more than one rustls crypto backend can end up enabled
// in the dependency graph, in which case there is no process-wide default.
fn crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

fn build_tls_server_config(
    cert: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
    client_verifier: Option<Arc<dyn rustls::server::danger::ClientCertVerifier>>,
) -> Result<ServerConfig> {
    let builder = ServerConfig::builder_with_provider(crypto_provider())
        .with_safe_default_protocol_versions()?;
    let mut server_config = match client_verifier {
        Some(client_verifier) => builder
            .with_client_cert_verifier(client_verifier)
            .with_single_cert(cert, key)?,
        None => builder.with_no_client_auth().with_single_cert(cert, key)?,
    };
    server_config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(server_config)
}

pub(crate) async fn load_server_cert_and_key(
    cert_file: &Path,
    key_file: &Path,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
    let cert_contents = tokio::fs::read(cert_file)
        .await
        .map_err(|e| anyhow!("Cannot read certificate file {}: {e}", cert_file.display()))?;
    let key_contents = tokio::fs::read(key_file)
        .await
        .map_err(|e| anyhow!("Cannot read key file {}: {e}", key_file.display()))?;

    let cert_iterator: SliceIter<CertificateDer> = SliceIter::new(&cert_contents[..]);
    let certs: Vec<_> = cert_iterator
        .filter_map(|it| {
            if let Err(ref e) = it {
                warn!("Cannot parse certificate: {e}");
            }
            it.ok()
        })
        .collect();

    if certs.len() != 1 {
        return Err(anyhow!(
            "Expected exactly one certificate in certificate file, found {}",
            certs.len()
        ));
    }

    let key_iterator: SliceIter<PrivateKeyDer> = SliceIter::new(&key_contents[..]);
    let mut keys: Vec<PrivateKeyDer> = key_iterator
        .filter_map(|it| {
            if let Err(ref e) = it {
                warn!("Cannot parse private key: {e}");
            }
            it.ok()
        })
        .collect();

    if keys.len() != 1 {
        return Err(anyhow!(
            "Expected exactly one key in key file, found {}",
            keys.len()
        ));
    }

    Ok((certs, keys.remove(0)))
}

async fn load_client_ca_certs(
    client_cas: Vec<PathBuf>,
) -> Result<Arc<dyn rustls::server::danger::ClientCertVerifier>> {
    let mut store = RootCertStore::empty();
    for client_ca_file in client_cas {
        let client_ca_contents = tokio::fs::read(&client_ca_file).await.map_err(|e| {
            anyhow!(
                "Cannot read client CA file {}: {e}",
                client_ca_file.display()
            )
        })?;
        let cert_iterator: SliceIter<CertificateDer> = SliceIter::new(&client_ca_contents[..]);

        let client_ca_certs: Vec<_> = cert_iterator
            .filter_map(|it| {
                if let Err(ref e) = it {
                    warn!("Cannot parse client CA certificate: {e}");
                }
                it.ok()
            })
            .collect();
        let (cert_added, cert_ignored) = store.add_parsable_certificates(client_ca_certs);
        info!(
            client_ca_certs_added = cert_added,
            client_ca_certs_ignored = cert_ignored,
            "Loaded client CA certificates"
        );
    }

    WebPkiClientVerifier::builder_with_provider(Arc::new(store), crypto_provider())
        .build()
        .map_err(|e| anyhow!("Cannot build client verifier: {e}"))
}
