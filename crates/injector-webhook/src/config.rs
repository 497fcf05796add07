use anyhow::{anyhow, Result};
use clap::ArgMatches;
use lazy_static::lazy_static;
use secrets_injector::injection_profile::{InjectionProfile, SecretsInjectorOptions};
use secrets_injector::InjectorSettings;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

lazy_static! {
    pub(crate) static ref HOSTNAME: String =
        std::env::var("HOSTNAME").unwrap_or_else(|_| String::from("unknown"));
}

pub struct Config {
    pub addr: SocketAddr,
    pub tls_config: Option<TlsConfig>,
    pub injector_settings: InjectorSettings,
    pub log_level: String,
    pub log_fmt: String,
    pub log_no_color: bool,
}

#[derive(Clone, Debug)]
pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub client_ca_file: Vec<PathBuf>,
}

impl Config {
    pub fn from_args(matches: &ArgMatches) -> Result<Self> {
        let addr = api_bind_address(matches)?;
        let tls_config = tls_config(matches)?;
        let injector_settings = injector_settings(matches)?;

        let log_level = matches
            .get_one::<String>("log-level")
            .expect("This should not happen, there's a default value for log-level")
            .to_owned();
        let log_fmt = matches
            .get_one::<String>("log-fmt")
            .expect("This should not happen, there's a default value for log-fmt")
            .to_owned();
        let log_no_color = matches
            .get_one::<bool>("log-no-color")
            .expect("clap should have assigned a default value")
            .to_owned();

        Ok(Self {
            addr,
            tls_config,
            injector_settings,
            log_level,
            log_fmt,
            log_no_color,
        })
    }
}

fn api_bind_address(matches: &ArgMatches) -> Result<SocketAddr> {
    format!(
        "{}:{}",
        matches
            .get_one::<String>("address")
            .expect("clap should have assigned a default value"),
        matches
            .get_one::<String>("port")
            .expect("clap should have assigned a default value")
    )
    .parse()
    .map_err(|e| anyhow!("error parsing arguments: {}", e))
}

fn tls_config(matches: &ArgMatches) -> Result<Option<TlsConfig>> {
    let cert_file = matches
        .get_one::<String>("cert-file")
        .expect("clap should have assigned a default value")
        .to_owned();
    let key_file = matches
        .get_one::<String>("key-file")
        .expect("clap should have assigned a default value")
        .to_owned();
    let client_ca_file: Vec<PathBuf> = matches
        .get_many::<String>("client-ca-file")
        .map(|files| files.map(PathBuf::from).collect())
        .unwrap_or_default();

    if cert_file.is_empty() != key_file.is_empty() {
        return Err(anyhow!("error parsing arguments: either both --cert-file and --key-file must be provided, or neither"));
    }
    if cert_file.is_empty() {
        if !client_ca_file.is_empty() {
            return Err(anyhow!(
                "error parsing arguments: --client-ca-file requires --cert-file and --key-file"
            ));
        }
        return Ok(None);
    }

    Ok(Some(TlsConfig {
        cert_file: PathBuf::from(cert_file),
        key_file: PathBuf::from(key_file),
        client_ca_file,
    }))
}

fn injector_settings(matches: &ArgMatches) -> Result<InjectorSettings> {
    let annotation = matches
        .get_one::<String>("annotation")
        .expect("clap should have assigned a default value")
        .to_owned();

    let profile = match matches.get_one::<String>("profile-file") {
        Some(path) => InjectionProfile::from_file(Path::new(path)).map_err(|e| {
            anyhow!("error while loading injection profile from {}: {}", path, e)
        })?,
        None => builtin_profile(matches)?,
    };

    Ok(InjectorSettings {
        annotation,
        profile,
    })
}

fn builtin_profile(matches: &ArgMatches) -> Result<InjectionProfile> {
    let profile = matches
        .get_one::<String>("profile")
        .expect("clap should have assigned a default value");

    match profile.as_str() {
        "echo" => Ok(InjectionProfile::echo()),
        "secrets-injector" => {
            let secret_name = matches
                .get_one::<String>("secret-name")
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    anyhow!("error parsing arguments: the secrets-injector profile requires --secret-name")
                })?;
            let options = SecretsInjectorOptions {
                image: matches
                    .get_one::<String>("injector-image")
                    .expect("clap should have assigned a default value")
                    .to_owned(),
                secret_name: secret_name.to_owned(),
                secret_namespace: matches
                    .get_one::<String>("secret-namespace")
                    .expect("clap should have assigned a default value")
                    .to_owned(),
            };
            Ok(InjectionProfile::secrets_injector(&options))
        }
        other => Err(anyhow!("unknown injection profile: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli;
    use rstest::rstest;
    use secrets_injector::constants::{DEFAULT_INJECTION_ANNOTATION, DEFAULT_INJECTOR_IMAGE};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_from(flags: &[&str]) -> Result<Config> {
        let mut args = vec!["injector-webhook"];
        args.extend_from_slice(flags);
        let matches = cli::build_cli().try_get_matches_from(args).unwrap();
        Config::from_args(&matches)
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 9443)));
        assert!(config.tls_config.is_none());
        assert_eq!(
            config.injector_settings.annotation,
            DEFAULT_INJECTION_ANNOTATION
        );
        assert_eq!(config.injector_settings.profile, InjectionProfile::echo());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_fmt, "text");
        assert!(!config.log_no_color);
    }

    #[test]
    fn tls_files() {
        let config = config_from(&[
            "--cert-file=/tls/tls.crt",
            "--key-file=/tls/tls.key",
            "--client-ca-file=/tls/ca1.crt,/tls/ca2.crt",
        ])
        .unwrap();

        let tls_config = config.tls_config.unwrap();
        assert_eq!(tls_config.cert_file, PathBuf::from("/tls/tls.crt"));
        assert_eq!(tls_config.key_file, PathBuf::from("/tls/tls.key"));
        assert_eq!(
            tls_config.client_ca_file,
            vec![PathBuf::from("/tls/ca1.crt"), PathBuf::from("/tls/ca2.crt")]
        );
    }

    #[rstest]
    #[case::cert_without_key(&["--cert-file=/tls/tls.crt"])]
    #[case::key_without_cert(&["--key-file=/tls/tls.key"])]
    #[case::client_ca_without_tls(&["--client-ca-file=/tls/ca.crt"])]
    #[case::secrets_injector_without_secret(&["--profile=secrets-injector"])]
    #[case::missing_profile_file(&["--profile-file=/does/not/exist.yml"])]
    fn invalid_flags(#[case] flags: &[&str]) {
        assert!(config_from(flags).is_err());
    }

    #[test]
    fn secrets_injector_profile() {
        let config = config_from(&[
            "--profile=secrets-injector",
            "--secret-name=db-credentials",
            "--secret-namespace=payments",
        ])
        .unwrap();

        let profile = config.injector_settings.profile;
        assert_eq!(
            profile.init_container.image.as_deref(),
            Some(DEFAULT_INJECTOR_IMAGE)
        );
        assert_eq!(profile.volume.unwrap().name, "injected-secrets");
        let command = profile.init_container.command.unwrap();
        assert!(command.contains(&"db-credentials".to_owned()));
        assert!(command.contains(&"payments".to_owned()));
    }

    #[test]
    fn profile_file_overrides_builtin_profile() {
        let mut profile_file = NamedTempFile::new().unwrap();
        profile_file
            .write_all(b"initContainer:\n  name: custom\n  image: registry.example.com/custom:1.0\n")
            .unwrap();
        let profile_flag = format!("--profile-file={}", profile_file.path().display());

        let config = config_from(&["--profile=secrets-injector", &profile_flag]).unwrap();

        assert_eq!(config.injector_settings.profile.init_container.name, "custom");
        assert!(config.injector_settings.profile.volume.is_none());
    }

    #[test]
    fn custom_annotation() {
        let config =
            config_from(&["--annotation=secrets.opensecrecy.org/inject-encrypted-secrets"])
                .unwrap();

        assert_eq!(
            config.injector_settings.annotation,
            "secrets.opensecrecy.org/inject-encrypted-secrets"
        );
    }

    #[test]
    fn boolean_flags() {
        for provide_flag in [true, false] {
            let mut flags = vec![];
            if provide_flag {
                flags.push("--log-no-color");
            }

            let config = config_from(&flags).unwrap();
            assert_eq!(provide_flag, config.log_no_color);
        }
    }
}
