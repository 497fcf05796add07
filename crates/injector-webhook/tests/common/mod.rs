use axum::Router;
use injector_webhook::{config::Config, InjectorServer};
use secrets_injector::InjectorSettings;
use std::net::SocketAddr;

pub(crate) fn default_test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
        tls_config: None,
        injector_settings: InjectorSettings::default(),
        log_level: "info".to_owned(),
        log_fmt: "json".to_owned(),
        log_no_color: false,
    }
}

pub(crate) async fn app(config: Config) -> Router {
    let server = InjectorServer::new_from_config(config).await.unwrap();

    server.router()
}
