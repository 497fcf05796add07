use k8s_openapi::api::core::v1::{Container, EmptyDirVolumeSource, Volume, VolumeMount};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_INJECTOR_IMAGE, INIT_CONTAINER_NAME, INJECTED_SECRETS_MOUNT_PATH,
    INJECTED_SECRETS_VOLUME_NAME,
};
use crate::errors::ProfileError;

/// What gets added to an opted-in Pod: one init container and, optionally,
/// the volume it writes the decrypted secrets into.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionProfile {
    pub init_container: Container,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Volume>,
}

/// Parameters of the `secrets-injector` built-in profile
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretsInjectorOptions {
    pub image: String,
    pub secret_name: String,
    pub secret_namespace: String,
}

impl Default for SecretsInjectorOptions {
    fn default() -> Self {
        SecretsInjectorOptions {
            image: DEFAULT_INJECTOR_IMAGE.to_owned(),
            secret_name: String::new(),
            secret_namespace: String::from("default"),
        }
    }
}

impl Default for InjectionProfile {
    fn default() -> Self {
        InjectionProfile::echo()
    }
}

impl InjectionProfile {
    /// Diagnostic profile: a busybox container printing a greeting, no volume.
    pub fn echo() -> Self {
        InjectionProfile {
            init_container: Container {
                name: INIT_CONTAINER_NAME.to_owned(),
                image: Some("busybox".to_owned()),
                command: Some(vec!["echo".to_owned(), "Hello, World!".to_owned()]),
                ..Default::default()
            },
            volume: None,
        }
    }

    /// Fetch and decrypt `secret_name` into an emptyDir shared with the Pod.
    pub fn secrets_injector(options: &SecretsInjectorOptions) -> Self {
        InjectionProfile {
            init_container: Container {
                name: INIT_CONTAINER_NAME.to_owned(),
                image: Some(options.image.clone()),
                command: Some(vec![
                    "secrets-injector".to_owned(),
                    "--secret-name".to_owned(),
                    options.secret_name.clone(),
                    "--namespace".to_owned(),
                    options.secret_namespace.clone(),
                    "--output-dir".to_owned(),
                    INJECTED_SECRETS_MOUNT_PATH.to_owned(),
                ]),
                volume_mounts: Some(vec![VolumeMount {
                    name: INJECTED_SECRETS_VOLUME_NAME.to_owned(),
                    mount_path: INJECTED_SECRETS_MOUNT_PATH.to_owned(),
                    ..Default::default()
                }]),
                ..Default::default()
            },
            volume: Some(Volume {
                name: INJECTED_SECRETS_VOLUME_NAME.to_owned(),
                empty_dir: Some(EmptyDirVolumeSource::default()),
                ..Default::default()
            }),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ProfileError> {
        let profile: InjectionProfile = serde_yaml::from_str(contents)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.init_container.name.is_empty() {
            return Err(ProfileError::Invalid(
                "init container name cannot be empty".to_owned(),
            ));
        }
        if self
            .init_container
            .image
            .as_deref()
            .is_none_or(str::is_empty)
        {
            return Err(ProfileError::Invalid(format!(
                "init container {} does not specify an image",
                self.init_container.name
            )));
        }
        if let Some(volume) = &self.volume {
            if volume.name.is_empty() {
                return Err(ProfileError::Invalid(
                    "volume name cannot be empty".to_owned(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn echo_profile() {
        let profile = InjectionProfile::echo();

        assert_eq!(profile.init_container.name, "init-container");
        assert_eq!(profile.init_container.image.as_deref(), Some("busybox"));
        assert!(profile.init_container.volume_mounts.is_none());
        assert!(profile.volume.is_none());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn secrets_injector_profile() {
        let profile = InjectionProfile::secrets_injector(&SecretsInjectorOptions {
            secret_name: "db-credentials".to_owned(),
            secret_namespace: "payments".to_owned(),
            ..Default::default()
        });

        assert_eq!(
            profile.init_container.image.as_deref(),
            Some(DEFAULT_INJECTOR_IMAGE)
        );
        let command = profile.init_container.command.as_ref().unwrap();
        assert!(command.contains(&"db-credentials".to_owned()));
        assert!(command.contains(&"payments".to_owned()));

        let mounts = profile.init_container.volume_mounts.as_ref().unwrap();
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].name, "injected-secrets");
        assert_eq!(mounts[0].mount_path, "/injected-secrets");

        let volume = profile.volume.as_ref().unwrap();
        assert_eq!(volume.name, "injected-secrets");
        assert!(volume.empty_dir.is_some());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn profile_from_yaml() {
        let input = r#"
---
initContainer:
  name: fetch-secrets
  image: registry.example.com/fetcher:1.2.3
  command: ["fetch", "--all"]
  volumeMounts:
    - name: secrets
      mountPath: /secrets
volume:
  name: secrets
  emptyDir:
    medium: Memory
"#;
        let profile = InjectionProfile::from_yaml(input).unwrap();

        assert_eq!(profile.init_container.name, "fetch-secrets");
        let volume = profile.volume.unwrap();
        assert_eq!(volume.name, "secrets");
        assert_eq!(
            volume.empty_dir.unwrap().medium.as_deref(),
            Some("Memory")
        );
    }

    #[test]
    fn profile_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"initContainer:\n  name: hello\n  image: busybox\n")
            .unwrap();

        let profile = InjectionProfile::from_file(file.path()).unwrap();

        assert_eq!(profile.init_container.name, "hello");
        assert!(profile.volume.is_none());
    }

    #[test]
    fn profile_from_missing_file() {
        let result = InjectionProfile::from_file(Path::new("/does/not/exist.yml"));

        assert!(matches!(result, Err(ProfileError::Read { .. })));
    }

    #[rstest]
    #[case::empty_container_name("initContainer:\n  name: ''\n  image: busybox\n")]
    #[case::missing_image("initContainer:\n  name: hello\n")]
    #[case::empty_image("initContainer:\n  name: hello\n  image: ''\n")]
    #[case::empty_volume_name(
        "initContainer:\n  name: hello\n  image: busybox\nvolume:\n  name: ''\n  emptyDir: {}\n"
    )]
    fn invalid_profiles(#[case] input: &str) {
        let result = InjectionProfile::from_yaml(input);

        assert!(matches!(result, Err(ProfileError::Invalid(_))));
    }

    #[test]
    fn unparsable_profile() {
        let result = InjectionProfile::from_yaml("initContainer: [1, 2]");

        assert!(matches!(result, Err(ProfileError::Parse(_))));
    }
}
