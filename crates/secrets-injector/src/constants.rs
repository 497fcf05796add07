/// Annotation that opts a Pod into the injection.
pub const DEFAULT_INJECTION_ANNOTATION: &str = "opensecrecy.io/inject-encrypted-secrets";

/// The only annotation value that enables the injection.
pub const INJECTION_ENABLED_VALUE: &str = "true";

pub const INIT_CONTAINER_NAME: &str = "init-container";

pub const INJECTED_SECRETS_VOLUME_NAME: &str = "injected-secrets";
pub const INJECTED_SECRETS_MOUNT_PATH: &str = "/injected-secrets";

pub const DEFAULT_INJECTOR_IMAGE: &str = "ghcr.io/opensecrecy/secrets-injector:v0.1.0";

pub const ADMISSION_REVIEW_V1: &str = "admission.k8s.io/v1";
pub const ADMISSION_REVIEW_V1BETA1: &str = "admission.k8s.io/v1beta1";

pub const POD_KIND: &str = "Pod";
