extern crate k8s_openapi;

pub mod admission_request;
pub mod admission_response;
pub mod constants;
pub mod errors;
pub mod injection_profile;
pub mod injector;
pub mod pod;

pub use injector::{InjectorSettings, JsonPodEncoder, PodEncoder, SecretsInjector};
