use secrets_injector::SecretsInjector;

pub(crate) struct ApiServerState {
    pub(crate) injector: SecretsInjector,
}
