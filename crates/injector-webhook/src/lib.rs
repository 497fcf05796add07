pub mod api;
mod certs;
pub mod cli;
pub mod config;
pub mod tracing;

use anyhow::{anyhow, Result};
use axum::{
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use secrets_injector::SecretsInjector;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::{self, TraceLayer};

use ::tracing::{info, Level};

use crate::api::{
    handlers::{mutate_handler, readiness_handler},
    state::ApiServerState,
};
use crate::certs::create_tls_config_and_watch_certificate_changes;
use crate::config::Config;

pub struct InjectorServer {
    router: Router,
    addr: SocketAddr,
    tls_config: Option<RustlsConfig>,
}

impl InjectorServer {
    pub async fn new_from_config(config: Config) -> Result<Self> {
        let injector = SecretsInjector::new(config.injector_settings)
            .map_err(|e| anyhow!("Invalid injector settings: {e}"))?;

        info!(
            annotation = injector.settings().annotation.as_str(),
            init_container = injector.settings().profile.init_container.name.as_str(),
            image = injector
                .settings()
                .profile
                .init_container
                .image
                .as_deref()
                .unwrap_or_default(),
            "secrets injector initialized"
        );

        let state = Arc::new(ApiServerState { injector });

        let tls_config = match config.tls_config {
            Some(tls_config) => {
                Some(create_tls_config_and_watch_certificate_changes(tls_config).await?)
            }
            None => None,
        };

        let router = Router::new()
            .route("/mutate", post(mutate_handler))
            .route("/readiness", get(readiness_handler))
            .with_state(state)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
            );

        Ok(Self {
            router,
            addr: config.addr,
            tls_config,
        })
    }

    pub async fn run(self) -> Result<()> {
        match self.tls_config {
            Some(tls_config) => {
                info!(address = %self.addr, "started HTTPS server");
                axum_server::bind_rustls(self.addr, tls_config)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            None => {
                info!(address = %self.addr, "started HTTP server");
                axum_server::bind(self.addr)
                    .serve(self.router.into_make_service())
                    .await?;
            }
        }

        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
