use tracing::{Span, debug, error, info, warn};

use crate::admission_request::AdmissionRequest;
use crate::admission_response::AdmissionResponse;
use crate::constants::{DEFAULT_INJECTION_ANNOTATION, INJECTION_ENABLED_VALUE};
use crate::errors::{InjectionError, ProfileError};
use crate::injection_profile::InjectionProfile;
use crate::pod::PodObject;

/// Turns the mutated Pod back into the bytes the patch is computed against.
#[cfg_attr(test, mockall::automock)]
pub trait PodEncoder: Send + Sync {
    fn encode(&self, pod: &PodObject) -> serde_json::Result<Vec<u8>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonPodEncoder;

impl PodEncoder for JsonPodEncoder {
    fn encode(&self, pod: &PodObject) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(pod)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InjectorSettings {
    /// Annotation that must be set to `"true"` for the injection to happen
    pub annotation: String,
    pub profile: InjectionProfile,
}

impl Default for InjectorSettings {
    fn default() -> Self {
        InjectorSettings {
            annotation: DEFAULT_INJECTION_ANNOTATION.to_owned(),
            profile: InjectionProfile::default(),
        }
    }
}

/// Decides, for every Pod admission request, whether the encrypted-secrets
/// init container must be added and builds the matching response.
///
/// The injector holds no per-request state and can be shared between
/// concurrent requests.
pub struct SecretsInjector<E: PodEncoder = JsonPodEncoder> {
    settings: InjectorSettings,
    encoder: E,
}

impl SecretsInjector<JsonPodEncoder> {
    pub fn new(settings: InjectorSettings) -> Result<Self, ProfileError> {
        SecretsInjector::with_encoder(settings, JsonPodEncoder)
    }
}

impl<E: PodEncoder> SecretsInjector<E> {
    pub fn with_encoder(settings: InjectorSettings, encoder: E) -> Result<Self, ProfileError> {
        if settings.annotation.is_empty() {
            return Err(ProfileError::Invalid(
                "injection annotation cannot be empty".to_owned(),
            ));
        }
        settings.profile.validate()?;

        Ok(SecretsInjector { settings, encoder })
    }

    pub fn settings(&self) -> &InjectorSettings {
        &self.settings
    }

    #[tracing::instrument(
        name = "inject_encrypted_secrets",
        fields(
            request_uid = request.uid.as_str(),
            name = request.name.as_deref().unwrap_or_default(),
            injected = tracing::field::Empty,
        ),
        skip_all)]
    pub fn handle(&self, request: &AdmissionRequest) -> AdmissionResponse {
        if !request.is_pod() {
            info!(
                kind = request.kind.kind.as_str(),
                kind_group = request.kind.group.as_str(),
                "not a pod, letting it through"
            );
            return AdmissionResponse::allowed(request.uid.clone(), "");
        }

        self.decide(&request.uid, request.raw_object())
    }

    fn decide(&self, uid: &str, raw: Option<&[u8]>) -> AdmissionResponse {
        match self.mutate(uid, raw) {
            Ok(response) => {
                Span::current().record("injected", response.patch.is_some());
                response
            }
            Err(err @ (InjectionError::MissingObject | InjectionError::Decode(_))) => {
                warn!(error = %err, "cannot decode object");
                AdmissionResponse::errored(uid.to_owned(), err.code(), err.to_string())
            }
            Err(err) => {
                error!(error = %err, "cannot build mutated object");
                AdmissionResponse::errored(uid.to_owned(), err.code(), err.to_string())
            }
        }
    }

    fn mutate(&self, uid: &str, raw: Option<&[u8]>) -> Result<AdmissionResponse, InjectionError> {
        let raw = raw.ok_or(InjectionError::MissingObject)?;
        let mut pod = PodObject::from_slice(raw).map_err(InjectionError::Decode)?;

        if !pod.display_name().is_empty() {
            Span::current().record("name", pod.display_name());
        }

        if !self.wants_injection(&pod) {
            info!(
                annotation = self.settings.annotation.as_str(),
                "pod does not have the injection annotation or it is not set to true"
            );
            return Ok(AdmissionResponse::allowed(uid.to_owned(), ""));
        }

        self.inject(&mut pod);

        let mutated = self.encoder.encode(&pod).map_err(InjectionError::Encode)?;
        let response = AdmissionResponse::patch_from_raw(uid.to_owned(), raw, &mutated)?;

        info!(
            init_container = self.settings.profile.init_container.name.as_str(),
            init_containers = pod.init_containers().len(),
            volume = self
                .settings
                .profile
                .volume
                .as_ref()
                .map(|v| v.name.as_str())
                .unwrap_or_default(),
            "init container injected"
        );
        debug!(patch = ?response.patch, "patch computed");

        Ok(response)
    }

    /// Only the exact, case-sensitive value `"true"` enables the injection.
    fn wants_injection(&self, pod: &PodObject) -> bool {
        pod.annotation(&self.settings.annotation) == Some(INJECTION_ENABLED_VALUE)
    }

    // TODO: skip the injection when an init container with the profile's name
    // is already present; re-admitting a mutated Pod currently adds a second one.
    fn inject(&self, pod: &mut PodObject) {
        pod.push_init_container(self.settings.profile.init_container.clone());
        if let Some(volume) = &self.settings.profile.volume {
            pod.push_volume(volume.clone());
        }
    }
}
