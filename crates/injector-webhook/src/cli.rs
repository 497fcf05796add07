use clap::builder::PossibleValue;
use clap::{crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, Command};
use secrets_injector::constants::{DEFAULT_INJECTION_ANNOTATION, DEFAULT_INJECTOR_IMAGE};

pub fn build_cli() -> Command {
    let mut args = vec![
        Arg::new("log-level")
            .long("log-level")
            .value_name("LOG_LEVEL")
            .env("INJECTOR_LOG_LEVEL")
            .default_value("info")
            .value_parser([
                PossibleValue::new("trace"),
                PossibleValue::new("debug"),
                PossibleValue::new("info"),
                PossibleValue::new("warn"),
                PossibleValue::new("error"),
            ])
            .help("Log level"),
        Arg::new("log-fmt")
            .long("log-fmt")
            .value_name("LOG_FMT")
            .env("INJECTOR_LOG_FMT")
            .default_value("text")
            .value_parser([PossibleValue::new("text"), PossibleValue::new("json")])
            .help("Log output format"),
        Arg::new("log-no-color")
            .long("log-no-color")
            .env("NO_COLOR")
            .action(ArgAction::SetTrue)
            .help("Disable colored output for logs"),
        Arg::new("address")
            .long("addr")
            .value_name("BIND_ADDRESS")
            .default_value("0.0.0.0")
            .env("INJECTOR_BIND_ADDRESS")
            .help("Bind against ADDRESS"),
        Arg::new("port")
            .long("port")
            .value_name("PORT")
            .default_value("9443")
            .env("INJECTOR_PORT")
            .help("Listen on PORT"),
        Arg::new("cert-file")
            .long("cert-file")
            .value_name("CERT_FILE")
            .default_value("")
            .env("INJECTOR_CERT_FILE")
            .help("Path to an X.509 certificate file for HTTPS"),
        Arg::new("key-file")
            .long("key-file")
            .value_name("KEY_FILE")
            .default_value("")
            .env("INJECTOR_KEY_FILE")
            .help("Path to an X.509 private key file for HTTPS"),
        Arg::new("client-ca-file")
            .long("client-ca-file")
            .value_name("CLIENT_CA_FILE")
            .env("INJECTOR_CLIENT_CA_FILE")
            .value_delimiter(',')
            .action(ArgAction::Append)
            .help("Path to CA certificates used to verify client certificates. Enables mTLS"),
        Arg::new("annotation")
            .long("annotation")
            .value_name("ANNOTATION")
            .default_value(DEFAULT_INJECTION_ANNOTATION)
            .env("INJECTOR_ANNOTATION")
            .help("Pod annotation that must be set to \"true\" to request the injection"),
        Arg::new("profile")
            .long("profile")
            .value_name("PROFILE")
            .default_value("echo")
            .env("INJECTOR_PROFILE")
            .value_parser([
                PossibleValue::new("echo"),
                PossibleValue::new("secrets-injector"),
            ])
            .help("Built-in injection profile"),
        Arg::new("profile-file")
            .long("profile-file")
            .value_name("PROFILE_FILE")
            .env("INJECTOR_PROFILE_FILE")
            .help("YAML file describing the init container and volume to inject. Overrides --profile"),
        Arg::new("injector-image")
            .long("injector-image")
            .value_name("IMAGE")
            .default_value(DEFAULT_INJECTOR_IMAGE)
            .env("INJECTOR_IMAGE")
            .help("Image of the secrets-injector init container"),
        Arg::new("secret-name")
            .long("secret-name")
            .value_name("SECRET_NAME")
            .env("INJECTOR_SECRET_NAME")
            .help("Encrypted secret fetched by the secrets-injector init container"),
        Arg::new("secret-namespace")
            .long("secret-namespace")
            .value_name("SECRET_NAMESPACE")
            .default_value("default")
            .env("INJECTOR_SECRET_NAMESPACE")
            .help("Namespace of the encrypted secret"),
    ];
    args.sort_by(|a, b| a.get_id().cmp(b.get_id()));

    Command::new(crate_name!())
        .author(crate_authors!())
        .version(crate_version!())
        .about(crate_description!())
        .args(args)
}
