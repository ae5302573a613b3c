use anyhow::Context as _;
use backdrop_cli::commands::{self, Cli};
use backdrop_cli::config::{self, ConfigOverrides};
use backdrop_cli::logger;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        domain: cli.domain.clone(),
    };
    let app_config = match config::load_config(cli.config.as_deref(), &overrides).into_result() {
        Ok(app_config) => app_config,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    logger::setup_logger(app_config.logging()).context("installing logger")?;
    log::info!(
        "Previewing backgrounds for domain '{}' starting in {} mode",
        app_config.domain(),
        cli.theme
    );

    commands::run(cli, app_config).await
}
