use anyhow::Result;
use injector_webhook::{cli, config::Config, tracing::setup_tracing, InjectorServer};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = Config::from_args(&matches)?;

    setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let server = InjectorServer::new_from_config(config).await?;
        server.run().await
    })
}
